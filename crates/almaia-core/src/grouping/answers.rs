use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One persisted answer row. Many rows share a `question_id`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnsweredRecord {
    pub question_id: i64,
    pub group_tag: String,
    pub prompt_text: String,
    pub option_id: i64,
    pub option_label: String,
    pub student_id: i64,
}

/// One answer inside a [`GroupedQuestion`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedAnswer {
    pub option_id: i64,
    pub option_label: String,
    pub student_id: i64,
}

/// All answers given to one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedQuestion {
    pub question_id: i64,
    /// Taken from the first row seen for this question.
    pub group_tag: String,
    /// Taken from the first row seen for this question.
    pub prompt_text: String,
    pub answers: Vec<GroupedAnswer>,
}

/// Group answer rows per question, in first-seen question order.
pub fn group_answers_by_question(records: &[AnsweredRecord]) -> Vec<GroupedQuestion> {
    let mut groups: IndexMap<i64, GroupedQuestion> = IndexMap::new();

    for record in records {
        groups
            .entry(record.question_id)
            .or_insert_with(|| GroupedQuestion {
                question_id: record.question_id,
                group_tag: record.group_tag.clone(),
                prompt_text: record.prompt_text.clone(),
                answers: Vec::new(),
            })
            .answers
            .push(GroupedAnswer {
                option_id: record.option_id,
                option_label: record.option_label.clone(),
                student_id: record.student_id,
            });
    }

    groups.into_values().collect()
}
