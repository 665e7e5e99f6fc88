//! Integration tests for the backend client against a mock server.

use almaia_core::storage::{AlertConfig, ApiConfig};
use almaia_core::{AlertRequest, ApiClient, ApiError, StudentContext};
use mockito::{Matcher, Server};

fn client_for(server: &Server) -> ApiClient {
    let config = ApiConfig {
        base_url: format!("{}/api/v1", server.url()),
        timeout_secs: 5,
        ..ApiConfig::default()
    };
    ApiClient::new(&config).unwrap()
}

fn student() -> StudentContext {
    StudentContext::new(7).with_token("tok-123")
}

#[tokio::test]
async fn test_fetch_questions_normalizes_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/alumnos/preguntas")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"data": [
                {"pregunta_id": 1, "plantilla": "mood-grid", "texto_pregunta": "¿Cómo estás?",
                 "respuestas": [{"respuesta_posible_id": 1, "nombre": "Muy mal"}]},
                {"plantilla": "free-text", "texto_pregunta": "sin id"}
            ]}"#,
        )
        .create_async()
        .await;

    let questions = client_for(&server).fetch_questions(None).await.unwrap();

    mock.assert_async().await;
    assert_eq!(questions.records.len(), 1);
    assert_eq!(questions.records[0].question_id, 1);
    assert_eq!(questions.records[0].possible_answers[0].label, "Muy mal");
    assert_eq!(questions.defaulted.len(), 1);
}

#[tokio::test]
async fn test_fetch_tasks_sends_student_and_token() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/colegios/alumnos_tareas")
        .match_query(Matcher::UrlEncoded("alumno_id".into(), "7".into()))
        .match_header("authorization", "Bearer tok-123")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r##"[
                {"id": 1, "materia": "Historia", "descripcion": "Ensayo",
                 "fecha_entrega": "2025-03-30T11:55:00", "color": "#FF9800"}
            ]"##,
        )
        .create_async()
        .await;

    let tasks = client_for(&server).fetch_tasks(&student()).await.unwrap();

    mock.assert_async().await;
    assert!(tasks.is_clean());
    assert_eq!(tasks.records[0].subject, "Historia");
    assert_eq!(tasks.records[0].color_tag, "#FF9800");
}

#[tokio::test]
async fn test_fetch_answers_groups_nested_rows() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/v1/alumnos/respuestas")
        .match_query(Matcher::UrlEncoded("alumno_id".into(), "7".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[
                {"pregunta_id": 3, "respuesta_posible_id": 2, "alumno_id": 7,
                 "preguntas": {"grupo_preguntas": "animo", "texto_pregunta": "¿Cómo dormiste?"},
                 "respuestas_posibles": {"nombre": "Bien"}},
                {"pregunta_id": 3, "respuesta_posible_id": 4, "alumno_id": 7,
                 "preguntas": {"grupo_preguntas": "animo", "texto_pregunta": "¿Cómo dormiste?"},
                 "respuestas_posibles": {"nombre": "Mal"}}
            ]"#,
        )
        .create_async()
        .await;

    let rows = client_for(&server).fetch_answers(&student()).await.unwrap();
    let grouped = almaia_core::group_answers_by_question(&rows.records);

    assert_eq!(grouped.len(), 1);
    assert_eq!(grouped[0].prompt_text, "¿Cómo dormiste?");
    let labels: Vec<&str> = grouped[0]
        .answers
        .iter()
        .map(|a| a.option_label.as_str())
        .collect();
    assert_eq!(labels, vec!["Bien", "Mal"]);
}

#[tokio::test]
async fn test_student_calls_require_token() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server);
    let anonymous = StudentContext::new(7);

    assert!(matches!(
        client.fetch_tasks(&anonymous).await,
        Err(ApiError::MissingToken)
    ));
    assert!(matches!(
        client.fetch_answers(&anonymous).await,
        Err(ApiError::MissingToken)
    ));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_send_alert_posts_backend_shape() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v1/alumnos/alertas")
        .match_header("authorization", "Bearer tok-123")
        .match_body(Matcher::Json(serde_json::json!({
            "alumno_id": 7,
            "mensaje": "me siento muy solo hoy"
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": 99}"#)
        .create_async()
        .await;

    let alert = AlertRequest::new(7, " me siento muy solo hoy ", &AlertConfig::default()).unwrap();
    let reply = client_for(&server)
        .send_alert(&student(), &alert)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(reply["id"], 99);
}

#[tokio::test]
async fn test_error_statuses_map_to_api_errors() {
    let mut server = Server::new_async().await;
    let _bad = server
        .mock("POST", "/api/v1/alumnos/alertas")
        .with_status(400)
        .with_body(r#"{"message": "Mensaje inválido"}"#)
        .create_async()
        .await;
    let _expired = server
        .mock("GET", "/api/v1/colegios/alumnos_tareas")
        .match_query(Matcher::Any)
        .with_status(401)
        .create_async()
        .await;
    let _down = server
        .mock("GET", "/api/v1/alumnos/respuestas")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body(r#"{"error": "db offline"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let alert = AlertRequest::new(7, "necesito ayuda ahora", &AlertConfig::default()).unwrap();

    match client.send_alert(&student(), &alert).await {
        Err(ApiError::BadRequest(message)) => assert_eq!(message, "Mensaje inválido"),
        other => panic!("expected BadRequest, got {other:?}"),
    }
    assert!(matches!(
        client.fetch_tasks(&student()).await,
        Err(ApiError::Unauthorized)
    ));
    match client.fetch_answers(&student()).await {
        Err(ApiError::Server { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "db offline");
        }
        other => panic!("expected Server, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_array_body_is_a_decode_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/v1/alumnos/preguntas")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "ok"}"#)
        .create_async()
        .await;

    assert!(matches!(
        client_for(&server).fetch_questions(None).await,
        Err(ApiError::Decode(_))
    ));
}

#[tokio::test]
async fn test_health() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/v1/health")
        .with_status(200)
        .with_body("OK")
        .create_async()
        .await;

    assert!(client_for(&server).health().await.is_ok());
}
