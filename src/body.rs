use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, HeaderMap},
    Form,
};
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::models::TransactionRequest;

#[derive(Debug, PartialEq)]
enum BodyKind {
    Json,
    Form,
    Other,
}

fn body_kind(headers: &HeaderMap) -> BodyKind {
    let Some(content_type) = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return BodyKind::Other;
    };
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    if essence.eq_ignore_ascii_case("application/json") {
        BodyKind::Json
    } else if essence.eq_ignore_ascii_case("application/x-www-form-urlencoded") {
        BodyKind::Form
    } else {
        BodyKind::Other
    }
}

#[async_trait]
impl<S> FromRequest<S> for TransactionRequest
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match body_kind(req.headers()) {
            BodyKind::Json => {
                let bytes = Bytes::from_request(req, state)
                    .await
                    .map_err(|err| AppError::Body(err.body_text()))?;
                Self::from_json(&bytes)
            }
            BodyKind::Form => {
                let Form(fields) = Form::<Vec<(String, String)>>::from_request(req, state)
                    .await
                    .map_err(|err| AppError::Body(err.body_text()))?;
                Ok(Self::from_form(fields))
            }
            // Unknown content types leave the body unparsed.
            BodyKind::Other => Ok(Self::default()),
        }
    }
}

impl TransactionRequest {
    fn from_json(bytes: &[u8]) -> Result<Self, AppError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|err| AppError::MalformedJson(err.to_string()))?;
        match value {
            Value::Object(mut fields) => Ok(Self {
                amount: fields.remove("amount"),
                customer: fields.remove("customer"),
                items: fields.remove("items"),
            }),
            Value::Array(_) => Ok(Self::default()),
            _ => Err(AppError::UnsupportedJson),
        }
    }

    fn from_form(fields: Vec<(String, String)>) -> Self {
        let mut fields = decode_nested_form(fields);
        Self {
            amount: fields.remove("amount"),
            customer: fields.remove("customer"),
            items: fields.remove("items"),
        }
    }
}

/// Largest bracket index still folded into an array; bigger ones stay object keys.
const MAX_ARRAY_INDEX: usize = 20;

/// Decodes bracketed form keys (`customer[name]`, `items[0][title]`,
/// `tags[]`) into nested JSON. Repeated keys collect into arrays.
fn decode_nested_form(fields: Vec<(String, String)>) -> Map<String, Value> {
    let mut root = Map::new();
    for (key, value) in fields {
        insert_path(&mut root, &key_segments(&key), value);
    }
    for value in root.values_mut() {
        fold_indexed_objects(value);
    }
    root
}

fn key_segments(key: &str) -> Vec<String> {
    let open = match key.find('[') {
        Some(open) if open > 0 => open,
        _ => return vec![key.to_string()],
    };
    let mut segments = vec![key[..open].to_string()];
    let mut rest = &key[open..];
    while let Some(inner) = rest.strip_prefix('[') {
        let Some(close) = inner.find(']') else {
            break;
        };
        segments.push(inner[..close].to_string());
        rest = &inner[close + 1..];
    }
    // Unbalanced trailing text is kept as one literal segment.
    if !rest.is_empty() {
        segments.push(rest.to_string());
    }
    segments
}

fn insert_path(target: &mut Map<String, Value>, segments: &[String], value: String) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };
    let key = if head.is_empty() {
        target.len().to_string()
    } else {
        head.clone()
    };

    if rest.is_empty() {
        match target.get_mut(&key) {
            None => {
                target.insert(key, Value::String(value));
            }
            Some(Value::Array(values)) => values.push(Value::String(value)),
            Some(existing) => {
                let previous = existing.take();
                *existing = Value::Array(vec![previous, Value::String(value)]);
            }
        }
        return;
    }

    let child = target
        .entry(key)
        .or_insert_with(|| Value::Object(Map::new()));
    // A scalar already sits here; the nested value is dropped.
    if let Value::Object(map) = child {
        insert_path(map, rest, value);
    }
}

/// Objects keyed only by small indices become arrays ordered by index.
fn fold_indexed_objects(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for child in map.values_mut() {
                fold_indexed_objects(child);
            }
            let indices: Option<Vec<usize>> = map
                .keys()
                .map(|key| key.parse::<usize>().ok().filter(|i| *i <= MAX_ARRAY_INDEX))
                .collect();
            if let Some(mut indices) = indices.filter(|indices| !indices.is_empty()) {
                indices.sort_unstable();
                let items = indices
                    .into_iter()
                    .filter_map(|index| map.remove(&index.to_string()))
                    .collect();
                *value = Value::Array(items);
            }
        }
        Value::Array(values) => values.iter_mut().for_each(fold_indexed_objects),
        _ => {}
    }
}
