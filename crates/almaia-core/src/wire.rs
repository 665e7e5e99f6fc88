//! Normalization boundary between backend JSON and the strict internal records.
//!
//! The backend is loose: Spanish snake_case keys in some endpoints, camelCase
//! in others, ids sent as numbers or strings, labels nested one level down.
//! Each endpoint gets one adapter here that turns raw JSON into
//! [`Question`], [`AnsweredRecord`] or [`TaskRecord`] values. Bad records are
//! repaired with defaults and reported, never raised.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

use crate::error::{MalformedRecord, Result};
use crate::grouping::{AnsweredRecord, TaskRecord};
use crate::questions::{AnswerOption, Question};

/// Records decoded from one response, plus what had to be repaired.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized<T> {
    pub records: Vec<T>,
    pub defaulted: Vec<MalformedRecord>,
}

impl<T> Normalized<T> {
    pub fn is_clean(&self) -> bool {
        self.defaulted.is_empty()
    }
}

fn lenient_i64<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<i64>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}

fn lenient_string<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }))
}

#[derive(Debug, Default, Deserialize)]
struct OptionDto {
    #[serde(
        default,
        alias = "respuesta_posible_id",
        alias = "optionId",
        deserialize_with = "lenient_i64"
    )]
    option_id: Option<i64>,
    #[serde(
        default,
        alias = "texto_respuesta",
        alias = "nombre",
        deserialize_with = "lenient_string"
    )]
    label: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct QuestionDto {
    #[serde(
        default,
        alias = "pregunta_id",
        alias = "questionId",
        deserialize_with = "lenient_i64"
    )]
    question_id: Option<i64>,
    #[serde(
        default,
        alias = "templateCode",
        alias = "plantilla",
        deserialize_with = "lenient_string"
    )]
    template_code: Option<String>,
    #[serde(
        default,
        alias = "texto_pregunta",
        alias = "promptText",
        deserialize_with = "lenient_string"
    )]
    prompt_text: Option<String>,
    #[serde(
        default,
        alias = "grupo_preguntas",
        alias = "groupTag",
        deserialize_with = "lenient_string"
    )]
    group_tag: Option<String>,
    #[serde(default, alias = "respuestas", alias = "possibleAnswers")]
    possible_answers: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct PromptDto {
    #[serde(default, deserialize_with = "lenient_string")]
    grupo_preguntas: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    texto_pregunta: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LabelDto {
    #[serde(default, deserialize_with = "lenient_string")]
    nombre: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AnsweredRecordDto {
    #[serde(
        default,
        alias = "pregunta_id",
        alias = "questionId",
        deserialize_with = "lenient_i64"
    )]
    question_id: Option<i64>,
    #[serde(
        default,
        alias = "respuesta_posible_id",
        alias = "optionId",
        deserialize_with = "lenient_i64"
    )]
    option_id: Option<i64>,
    #[serde(
        default,
        alias = "alumno_id",
        alias = "studentId",
        deserialize_with = "lenient_i64"
    )]
    student_id: Option<i64>,
    #[serde(default)]
    preguntas: Option<PromptDto>,
    #[serde(default)]
    respuestas_posibles: Option<LabelDto>,
    #[serde(
        default,
        alias = "grupo_preguntas",
        alias = "groupTag",
        deserialize_with = "lenient_string"
    )]
    group_tag: Option<String>,
    #[serde(
        default,
        alias = "texto_pregunta",
        alias = "promptText",
        deserialize_with = "lenient_string"
    )]
    prompt_text: Option<String>,
    #[serde(
        default,
        alias = "texto_respuesta",
        alias = "optionLabel",
        deserialize_with = "lenient_string"
    )]
    option_label: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct TaskDto {
    #[serde(default, deserialize_with = "lenient_i64")]
    id: Option<i64>,
    #[serde(default, alias = "materia", deserialize_with = "lenient_string")]
    subject: Option<String>,
    #[serde(default, alias = "descripcion", deserialize_with = "lenient_string")]
    description: Option<String>,
    #[serde(
        default,
        alias = "dueDateTime",
        alias = "fecha_entrega",
        deserialize_with = "lenient_string"
    )]
    due_date_time: Option<String>,
    #[serde(
        default,
        alias = "colorTag",
        alias = "color",
        deserialize_with = "lenient_string"
    )]
    color_tag: Option<String>,
}

/// Accept a bare array or an object wrapping it under `data`.
fn records_of<'a>(value: &'a Value, kind: &str) -> Result<&'a [Value]> {
    let array = match value {
        Value::Array(items) => Some(items),
        Value::Object(map) => map.get("data").and_then(Value::as_array),
        _ => None,
    };
    array
        .map(Vec::as_slice)
        .ok_or_else(|| serde_json::Error::custom(format!("expected a JSON array of {kind} records")).into())
}

fn report(kind: &'static str, index: usize, reason: String) -> MalformedRecord {
    let record = MalformedRecord {
        kind,
        index,
        reason,
    };
    warn!(%record, "repaired backend record");
    record
}

fn missing(fields: &[(&'static str, bool)]) -> Option<String> {
    let names: Vec<&str> = fields
        .iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| *name)
        .collect();
    (!names.is_empty()).then(|| format!("missing {}", names.join(", ")))
}

/// Decode one possible answer, with the reason when defaults were needed.
fn to_option(value: &Value) -> (AnswerOption, Option<String>) {
    let (dto, problem) = match serde_json::from_value::<OptionDto>(value.clone()) {
        Ok(dto) => {
            let problem = missing(&[
                ("option id", dto.option_id.is_some()),
                ("label", dto.label.is_some()),
            ]);
            (dto, problem)
        }
        Err(e) => (OptionDto::default(), Some(e.to_string())),
    };
    let option = AnswerOption {
        option_id: dto.option_id.unwrap_or(0),
        label: dto.label.unwrap_or_default(),
    };
    (option, problem)
}

/// Normalize a question list.
///
/// Questions without a usable id cannot be answered, so unlike the other
/// adapters these are dropped (and reported) instead of defaulted.
pub fn normalize_questions(value: &Value) -> Result<Normalized<Question>> {
    let mut out = Normalized {
        records: Vec::new(),
        defaulted: Vec::new(),
    };

    for (index, item) in records_of(value, "question")?.iter().enumerate() {
        let dto: QuestionDto = match serde_json::from_value(item.clone()) {
            Ok(dto) => dto,
            Err(e) => {
                out.defaulted.push(report("question", index, e.to_string()));
                continue;
            }
        };
        let Some(question_id) = dto.question_id else {
            out.defaulted
                .push(report("question", index, "missing question id".to_string()));
            continue;
        };
        if let Some(reason) = missing(&[
            ("template code", dto.template_code.is_some()),
            ("prompt text", dto.prompt_text.is_some()),
        ]) {
            out.defaulted.push(report("question", index, reason));
        }

        let mut possible_answers = Vec::with_capacity(dto.possible_answers.len());
        for (position, raw) in dto.possible_answers.iter().enumerate() {
            let (option, problem) = to_option(raw);
            if let Some(reason) = problem {
                let reason = format!("possible answer {position}: {reason}");
                out.defaulted.push(report("question", index, reason));
            }
            possible_answers.push(option);
        }

        out.records.push(Question {
            question_id,
            template_code: dto.template_code.unwrap_or_default(),
            prompt_text: dto.prompt_text.unwrap_or_default(),
            group_tag: dto.group_tag,
            possible_answers,
        });
    }

    Ok(out)
}

/// Normalize flat answer rows. Every input row yields one record.
pub fn normalize_answers(value: &Value) -> Result<Normalized<AnsweredRecord>> {
    let items = records_of(value, "answer")?;
    let mut out = Normalized {
        records: Vec::with_capacity(items.len()),
        defaulted: Vec::new(),
    };

    for (index, item) in items.iter().enumerate() {
        let dto: AnsweredRecordDto = match serde_json::from_value(item.clone()) {
            Ok(dto) => dto,
            Err(e) => {
                out.defaulted.push(report("answer", index, e.to_string()));
                AnsweredRecordDto::default()
            }
        };

        let prompt = dto.preguntas.unwrap_or_default();
        let group_tag = prompt.grupo_preguntas.or(dto.group_tag);
        let prompt_text = prompt.texto_pregunta.or(dto.prompt_text);
        let option_label = dto
            .respuestas_posibles
            .and_then(|l| l.nombre)
            .or(dto.option_label);

        if let Some(reason) = missing(&[
            ("question id", dto.question_id.is_some()),
            ("option id", dto.option_id.is_some()),
            ("student id", dto.student_id.is_some()),
        ]) {
            out.defaulted.push(report("answer", index, reason));
        }

        out.records.push(AnsweredRecord {
            question_id: dto.question_id.unwrap_or(0),
            group_tag: group_tag.unwrap_or_default(),
            prompt_text: prompt_text.unwrap_or_default(),
            option_id: dto.option_id.unwrap_or(0),
            option_label: option_label.unwrap_or_default(),
            student_id: dto.student_id.unwrap_or(0),
        });
    }

    Ok(out)
}

/// Normalize task rows. Every input row yields one record.
pub fn normalize_tasks(value: &Value) -> Result<Normalized<TaskRecord>> {
    let items = records_of(value, "task")?;
    let mut out = Normalized {
        records: Vec::with_capacity(items.len()),
        defaulted: Vec::new(),
    };

    for (index, item) in items.iter().enumerate() {
        let dto: TaskDto = match serde_json::from_value(item.clone()) {
            Ok(dto) => dto,
            Err(e) => {
                out.defaulted.push(report("task", index, e.to_string()));
                TaskDto::default()
            }
        };

        if let Some(reason) = missing(&[
            ("id", dto.id.is_some()),
            ("due date", dto.due_date_time.is_some()),
        ]) {
            out.defaulted.push(report("task", index, reason));
        }

        out.records.push(TaskRecord {
            id: dto.id.unwrap_or(0),
            subject: dto.subject.unwrap_or_default(),
            description: dto.description.unwrap_or_default(),
            due_date_time: dto.due_date_time.unwrap_or_default(),
            color_tag: dto.color_tag.unwrap_or_default(),
        });
    }

    Ok(out)
}
