//! Generic request dispatch: body encoding, execution and response decoding.

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Method, Request};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use url::form_urlencoded;
use url::Url;

use crate::client::Client;
use crate::errors::Error;

const CONTENT_TYPE_JSON: &str = "application/json";
const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

/// How a request body is encoded on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyKind {
    /// `application/json`.
    Json,
    /// `application/x-www-form-urlencoded`.
    Form,
}

/// A request body. Field names come from the serde attributes of the type;
/// optional fields are left out with `skip_serializing_if`.
pub trait RequestBody: Serialize {
    /// Encoding used for this body. Defaults to JSON.
    const KIND: BodyKind = BodyKind::Json;
}

/// An encoded body ready to attach to a request.
#[derive(Debug)]
pub(crate) struct EncodedBody {
    content_type: &'static str,
    bytes: Vec<u8>,
}

impl EncodedBody {
    pub(crate) fn encode<B: RequestBody>(body: &B) -> Result<Self, Error> {
        match B::KIND {
            BodyKind::Form => Ok(Self {
                content_type: CONTENT_TYPE_FORM,
                bytes: encode_form(body)?.into_bytes(),
            }),
            BodyKind::Json => Ok(Self {
                content_type: CONTENT_TYPE_JSON,
                bytes: serde_json::to_vec(body).map_err(Error::EncodeJson)?,
            }),
        }
    }
}

/// Encodes `body` as `application/x-www-form-urlencoded`.
///
/// Nulls are skipped, nested maps become `key[sub]=value` and arrays repeat
/// the key. Keys come out sorted.
pub(crate) fn encode_form<B: Serialize>(body: &B) -> Result<String, Error> {
    let value = serde_json::to_value(body).map_err(|e| Error::EncodeForm(e.to_string()))?;
    let Value::Object(fields) = value else {
        return Err(Error::EncodeForm(
            "form body must serialize to a map".to_string(),
        ));
    };

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in sorted(&fields) {
        append_form_value(&mut serializer, key, value);
    }
    Ok(serializer.finish())
}

fn append_form_value(
    serializer: &mut form_urlencoded::Serializer<'_, String>,
    key: &str,
    value: &Value,
) {
    match value {
        Value::Null => {}
        Value::String(s) => {
            serializer.append_pair(key, s);
        }
        Value::Bool(b) => {
            serializer.append_pair(key, &b.to_string());
        }
        Value::Number(n) => {
            serializer.append_pair(key, &n.to_string());
        }
        Value::Array(items) => {
            for item in items {
                append_form_value(serializer, key, item);
            }
        }
        Value::Object(fields) => {
            for (sub, item) in sorted(fields) {
                append_form_value(serializer, &format!("{}[{}]", key, sub), item);
            }
        }
    }
}

fn sorted(fields: &Map<String, Value>) -> Vec<(&String, &Value)> {
    let mut fields: Vec<_> = fields.iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));
    fields
}

/// Builds a request for `base_url + path`.
///
/// The path is appended without escaping, then parsed as a URL: dot segments
/// such as `../` are resolved and characters like spaces are
/// percent-encoded. Ids must already be URL-safe.
pub(crate) fn new_request(
    base_url: &str,
    method: Method,
    path: &str,
    body: Option<EncodedBody>,
) -> Result<Request, Error> {
    let url = Url::parse(&format!("{}{}", base_url, path))
        .map_err(|e| Error::InvalidRequest(format!("invalid url: {}", e)))?;

    let mut request = Request::new(method, url);
    if let Some(body) = body {
        request
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(body.content_type));
        *request.body_mut() = Some(body.bytes.into());
    }
    Ok(request)
}

impl Client {
    /// Makes an HTTP GET request and decodes the JSON response into `T`.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.send(Method::GET, path, None).await
    }

    /// Makes an HTTP POST request with `body`.
    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: RequestBody,
    {
        let body = EncodedBody::encode(body)?;
        self.send(Method::POST, path, Some(body)).await
    }

    /// Makes an HTTP PUT request with `body`.
    pub(crate) async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: RequestBody,
    {
        let body = EncodedBody::encode(body)?;
        self.send(Method::PUT, path, Some(body)).await
    }

    /// Makes an HTTP DELETE request.
    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.send(Method::DELETE, path, None).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<EncodedBody>,
    ) -> Result<T, Error> {
        let request = new_request(&self.settings().base_url(), method, path, body)?;
        let response = self.transport().round_trip(request).await?;

        // the response is consumed here, so its body is released on every path
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(Error::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct Signup {
        name: String,
        #[serde(skip_serializing_if = "String::is_empty")]
        nickname: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        age: Option<u32>,
        active: bool,
        #[serde(skip_serializing_if = "BTreeMap::is_empty")]
        extra: BTreeMap<String, String>,
        tags: Vec<String>,
    }

    impl RequestBody for Signup {
        const KIND: BodyKind = BodyKind::Form;
    }

    #[derive(Serialize)]
    struct Rename {
        name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    }

    impl RequestBody for Rename {}

    fn signup() -> Signup {
        Signup {
            name: "Bob Ross".to_string(),
            nickname: String::new(),
            age: None,
            active: true,
            extra: BTreeMap::new(),
            tags: Vec::new(),
        }
    }

    #[test]
    fn form_omits_empty_optional_fields() {
        insta::assert_snapshot!(encode_form(&signup()).unwrap(), @"active=true&name=Bob+Ross");
    }

    #[test]
    fn form_flattens_maps_and_arrays() {
        let mut body = signup();
        body.nickname = "bob".to_string();
        body.age = Some(52);
        body.extra.insert("Phone".to_string(), "555 0100".to_string());
        body.extra.insert("Start".to_string(), "2024-01-01".to_string());
        body.tags = vec!["a".to_string(), "b".to_string()];

        insta::assert_snapshot!(
            encode_form(&body).unwrap(),
            @"active=true&age=52&extra%5BPhone%5D=555+0100&extra%5BStart%5D=2024-01-01&name=Bob+Ross&nickname=bob&tags=a&tags=b"
        );
    }

    #[test]
    fn form_rejects_non_map_bodies() {
        let err = encode_form(&"just a string").unwrap_err();
        assert!(matches!(err, Error::EncodeForm(_)));
    }

    #[test]
    fn form_kind_selects_form_content_type() {
        let encoded = EncodedBody::encode(&signup()).unwrap();
        assert_eq!(encoded.content_type, CONTENT_TYPE_FORM);
        assert_eq!(encoded.bytes, b"active=true&name=Bob+Ross");
    }

    #[test]
    fn json_kind_keeps_fields_without_skip() {
        let encoded = EncodedBody::encode(&Rename {
            name: None,
            title: None,
        })
        .unwrap();
        assert_eq!(encoded.content_type, CONTENT_TYPE_JSON);
        let body: Value = serde_json::from_slice(&encoded.bytes).unwrap();
        assert_eq!(body, serde_json::json!({ "name": null }));
    }

    #[test]
    fn request_without_body_has_no_content_type() {
        let request = new_request("https://api.example.com/v1.2", Method::GET, "/employees", None)
            .unwrap();
        assert_eq!(request.url().as_str(), "https://api.example.com/v1.2/employees");
        assert!(request.headers().get(CONTENT_TYPE).is_none());
        assert!(request.body().is_none());
    }

    #[test]
    fn request_with_body_sets_content_type() {
        let body = EncodedBody::encode(&signup()).unwrap();
        let request = new_request(
            "https://api.example.com/v1.2",
            Method::POST,
            "/departments",
            Some(body),
        )
        .unwrap();
        assert_eq!(
            request.headers().get(CONTENT_TYPE).unwrap(),
            CONTENT_TYPE_FORM
        );
        assert_eq!(
            request.body().and_then(|b| b.as_bytes()),
            Some(&b"active=true&name=Bob+Ross"[..])
        );
    }

    #[test]
    fn path_is_normalized_by_url_parsing() {
        let base = "https://api.example.com/v1.2";
        let request = new_request(base, Method::DELETE, "/employees/../departments/dep_1", None)
            .unwrap();
        assert_eq!(request.url().path(), "/v1.2/departments/dep_1");

        let request = new_request(base, Method::GET, "/employees/a b", None).unwrap();
        assert_eq!(request.url().path(), "/v1.2/employees/a%20b");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = new_request("not a url", Method::GET, "/employees", None).unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }
}
