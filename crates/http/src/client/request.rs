//! Replayable request descriptors

use crate::error::ClientError;
use bytes::Bytes;
use reqwest::{Method, multipart};
use serde::Serialize;
use serde_json::Value as JsonValue;

/// One part of a multipart body
#[derive(Debug, Clone)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        mime: Option<String>,
        bytes: Bytes,
    },
}

impl FormPart {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Text {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn file(
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime: Option<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self::File {
            name: name.into(),
            file_name: file_name.into(),
            mime,
            bytes: bytes.into(),
        }
    }

    fn into_part(self) -> Result<(String, multipart::Part), ClientError> {
        match self {
            Self::Text { name, value } => Ok((name, multipart::Part::text(value))),
            Self::File {
                name,
                file_name,
                mime,
                bytes,
            } => {
                let part = multipart::Part::bytes(bytes.to_vec()).file_name(file_name);
                let part = match mime {
                    Some(mime) => part.mime_str(&mime)?,
                    None => part,
                };
                Ok((name, part))
            }
        }
    }
}

/// Request body kept in a form that can be sent more than once
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(JsonValue),
    Multipart(Vec<FormPart>),
}

/// An outbound call, rebuilt into a fresh `reqwest` request for every attempt.
///
/// `retried` is set once the call has been replayed after a token renewal;
/// a retried request is never renewed again. Requests built with
/// [`ApiRequest::without_renewal`] never renew at all: a `401` on them is an
/// ordinary failure.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: RequestBody,
    retried: bool,
    renewable: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: RequestBody::Empty,
            retried: false,
            renewable: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body
    ///
    /// # Errors
    ///
    /// Returns an error if `body` cannot be serialized
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ClientError> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn multipart(mut self, parts: Vec<FormPart>) -> Self {
        self.body = RequestBody::Multipart(parts);
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Add a query pair only when a value is present
    pub fn query_opt(self, key: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Report a `401` to the caller instead of renewing the access token.
    ///
    /// For calls where a `401` says nothing about the stored session, such as
    /// a rejected login or a logout.
    #[must_use]
    pub fn without_renewal(mut self) -> Self {
        self.renewable = false;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    pub fn is_retried(&self) -> bool {
        self.retried
    }

    /// Whether a `401` on this request may trigger a token renewal
    pub fn is_renewable(&self) -> bool {
        self.renewable && !self.retried
    }

    pub fn mark_retried(&mut self) {
        self.retried = true;
    }

    /// Build a sendable request, attaching `bearer` when given
    pub(crate) fn build(
        &self,
        http: &reqwest::Client,
        base_url: &str,
        bearer: Option<&str>,
    ) -> Result<reqwest::RequestBuilder, ClientError> {
        let url = format!("{base_url}{}", self.path);
        let mut builder = http.request(self.method.clone(), url);

        if !self.query.is_empty() {
            builder = builder.query(&self.query);
        }
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }

        builder = match &self.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(body),
            RequestBody::Multipart(parts) => {
                let mut form = multipart::Form::new();
                for part in parts.iter().cloned() {
                    let (name, part) = part.into_part()?;
                    form = form.part(name, part);
                }
                builder.multipart(form)
            }
        };

        Ok(builder)
    }
}
