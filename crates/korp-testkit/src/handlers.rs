//! Request routing for the fake backend.
//!
//! Status codes, messages and reply shapes follow the real backend, including
//! its German operator messages.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use serde_json::{Value, json};

use crate::{BackendState, RecordedRequest};
use korp_core::{Label, TrainingExample};

const UNAUTHORIZED: &str = "Autorisierung fehlgeschlagen.";
const TOP_WORDS: usize = 50;

pub(crate) fn handle(mut request: tiny_http::Request, state: &Mutex<BackendState>) {
    let method = request.method().to_string().to_ascii_uppercase();
    let path = request
        .url()
        .split('?')
        .next()
        .unwrap_or_default()
        .to_string();
    let authorization = request
        .headers()
        .iter()
        .find(|header| header.field.equiv("Authorization"))
        .map(|header| header.value.as_str().to_string());

    let mut raw = String::new();
    let _ = request.as_reader().read_to_string(&mut raw);
    let body: Value = serde_json::from_str(&raw).unwrap_or(Value::Null);

    let (status, reply) = {
        let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
        state.requests.push(RecordedRequest {
            method: method.clone(),
            path: path.clone(),
            authorization: authorization.clone(),
        });
        route(&mut state, &method, &path, authorization.as_deref(), &body)
    };

    tracing::debug!(%method, %path, status, "fake backend reply");
    let header = tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
        .expect("static header is valid");
    let response = tiny_http::Response::from_string(reply.to_string())
        .with_status_code(status)
        .with_header(header);
    let _ = request.respond(response);
}

fn route(
    state: &mut BackendState,
    method: &str,
    path: &str,
    authorization: Option<&str>,
    body: &Value,
) -> (u16, Value) {
    if let Some((status, message)) = state.take_failure(path) {
        return (status, json!({ "error": message }));
    }

    match (method, path) {
        ("POST", "/admin_login") => login(state, body),
        ("POST", "/predict") => predict(state, body),
        ("GET", "/get_data_status") => authorized(state, authorization, data_status),
        ("POST", "/add_data") => authorized(state, authorization, |state| add_data(state, body)),
        ("POST", "/delete_data") => {
            authorized(state, authorization, |state| delete_data(state, body))
        }
        ("POST", "/retrain_model") => authorized(state, authorization, retrain),
        ("GET", "/get_stats") => authorized(state, authorization, |state| {
            (200, stats(&state.examples))
        }),
        _ => (404, json!({ "error": "Not Found" })),
    }
}

fn authorized(
    state: &mut BackendState,
    authorization: Option<&str>,
    handler: impl FnOnce(&mut BackendState) -> (u16, Value),
) -> (u16, Value) {
    let valid = authorization
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|token| state.issued_tokens.contains(token));
    if !valid {
        return (401, json!({ "error": UNAUTHORIZED }));
    }
    handler(state)
}

fn login(state: &mut BackendState, body: &Value) -> (u16, Value) {
    let password = body.get("password").and_then(Value::as_str).unwrap_or("");
    if password != state.password {
        return (401, json!({ "error": "Falsches Passwort." }));
    }
    let token = state.mint_token();
    let mut reply = json!({ "message": "Login erfolgreich", "token": token });
    if state.include_login_data {
        reply["data"] = json!(state.examples);
        reply["word_counts"] = word_counts(&state.examples);
    }
    (200, reply)
}

fn data_status(state: &mut BackendState) -> (u16, Value) {
    match state.pending_training {
        Some(0) => {
            state.mark_all_trained();
            state.pending_training = None;
        }
        Some(remaining) => state.pending_training = Some(remaining - 1),
        None => {}
    }
    (
        200,
        json!({
            "data": state.examples,
            "stats": { "word_counts": word_counts(&state.examples) },
        }),
    )
}

fn add_data(state: &mut BackendState, body: &Value) -> (u16, Value) {
    let text = body.get("text").and_then(Value::as_str).unwrap_or("");
    let label = body
        .get("label")
        .and_then(|value| serde_json::from_value::<Label>(value.clone()).ok());
    let Some(label) = label.filter(|_| !text.is_empty()) else {
        return (400, json!({ "error": "Text und Label sind erforderlich." }));
    };
    state.examples.push(TrainingExample::pending(text, label));
    (
        200,
        json!({ "message": "Daten erfolgreich zur Trainingswarteschlange hinzugefügt!" }),
    )
}

fn delete_data(state: &mut BackendState, body: &Value) -> (u16, Value) {
    let text = body.get("text").and_then(Value::as_str).unwrap_or("");
    if text.is_empty() {
        return (400, json!({ "error": "Text zum Löschen ist erforderlich." }));
    }
    let before = state.examples.len();
    state.examples.retain(|example| example.text != text);
    if state.examples.len() == before {
        return (404, json!({ "error": "Text nicht gefunden." }));
    }
    (200, json!({ "message": "Daten erfolgreich gelöscht." }))
}

fn retrain(state: &mut BackendState) -> (u16, Value) {
    if state.training_lag == 0 {
        state.mark_all_trained();
    } else {
        state.pending_training = Some(state.training_lag);
    }
    (200, json!({ "message": "Modell wurde erfolgreich neu trainiert." }))
}

fn predict(state: &BackendState, body: &Value) -> (u16, Value) {
    let text = body.get("text").and_then(Value::as_str).unwrap_or("");
    if text.is_empty() {
        return (400, json!({ "error": "Kein Text bereitgestellt." }));
    }
    (200, json!(state.prediction))
}

fn tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect::<String>()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn words_for(examples: &[TrainingExample], label: Option<Label>) -> Vec<String> {
    examples
        .iter()
        .filter(|example| label.is_none_or(|label| example.label == label))
        .flat_map(|example| tokens(&example.text))
        .collect()
}

fn char_total(words: &[String]) -> usize {
    words.iter().map(|word| word.chars().count()).sum()
}

fn most_common(words: &[String]) -> Value {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for word in words {
        *counts.entry(word.as_str()).or_default() += 1;
    }
    let mut ranked: Vec<(&str, u64)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(TOP_WORDS);
    json!(ranked)
}

fn word_counts(examples: &[TrainingExample]) -> Value {
    let human = words_for(examples, Some(Label::Human)).len();
    let ai = words_for(examples, Some(Label::Ai)).len();
    json!({ "menschlich": human, "ki": ai, "total": human + ai })
}

fn stats(examples: &[TrainingExample]) -> Value {
    let human = words_for(examples, Some(Label::Human));
    let ai = words_for(examples, Some(Label::Ai));
    let all = words_for(examples, None);
    let sentences = examples
        .iter()
        .flat_map(|example| example.text.split(['.', '!', '?']))
        .filter(|sentence| !sentence.trim().is_empty())
        .count();

    json!({
        "total_words": all.len(),
        "total_chars": char_total(&all),
        "total_sentences": sentences,
        "human": {
            "word_count": human.len(),
            "char_count": char_total(&human),
            "frequent_words": most_common(&human),
        },
        "ki": {
            "word_count": ai.len(),
            "char_count": char_total(&ai),
            "frequent_words": most_common(&ai),
        },
        "total_frequent_words": most_common(&all),
    })
}
