use bootcamp_query::{DEFAULT_SORT_FIELD, FindOptions, RawParams, Sort, radius_filter, translate};
use bootcamp_store::{Lookup, Store};
use bson::Document;
use http::header::{CONTENT_TYPE, HeaderValue};
use http::{Method, Request, Response, StatusCode};
use percent_encoding::percent_decode_str;
use serde_json::{Value, json};

use crate::error::BootcampHttpError;
use crate::geocoder::Geocoder;
use crate::json::{document_to_json, documents_to_json};

/// Mount point of the bootcamp resource.
pub const BASE_PATH: &str = "/api/v1/bootcamps";

type HttpResult = Result<Response<Vec<u8>>, BootcampHttpError>;

pub struct BootcampHttp {
    store: Box<dyn Store>,
    geocoder: Box<dyn Geocoder>,
}

impl BootcampHttp {
    pub fn new(store: Box<dyn Store>, geocoder: Box<dyn Geocoder>) -> Self {
        Self { store, geocoder }
    }

    pub fn handle(&self, req: Request<Vec<u8>>) -> Response<Vec<u8>> {
        let method = req.method().clone();
        let path = req.uri().path().trim_end_matches('/').to_string();

        if method == Method::GET && path == "/healthz" {
            return json_response(StatusCode::OK, &json!({ "status": "ok" }));
        }

        let Some(rest) = path
            .strip_prefix(BASE_PATH)
            .filter(|rest| rest.is_empty() || rest.starts_with('/'))
        else {
            return error_response(StatusCode::NOT_FOUND, "Route not found");
        };
        let segments: Vec<String> = rest
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| percent_decode_str(s).decode_utf8_lossy().into_owned())
            .collect();
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();

        let result = match (&method, segments.as_slice()) {
            (&Method::GET, []) => self.list(&req),
            (&Method::POST, []) => self.create(&req),
            (&Method::GET, ["radius", zipcode, distance]) => self.within_radius(zipcode, distance),
            (&Method::GET, [id]) => self.get(id),
            (&Method::PUT, [id]) => self.update(id, &req),
            (&Method::DELETE, [id]) => self.delete(id),
            _ => return error_response(StatusCode::NOT_FOUND, "Route not found"),
        };

        result.unwrap_or_else(|e| {
            let status = e.status_code();
            if status.is_server_error() {
                tracing::error!(%method, %path, error = %e, "request failed");
            } else {
                tracing::debug!(%method, %path, error = %e, "request rejected");
            }
            error_response(status, &e.client_message())
        })
    }

    // ── Read routes ─────────────────────────────────────────────

    /// `count` and `find` are separate reads, so a write landing between
    /// them can leave `pagination` one step out of date relative to `data`.
    fn list(&self, req: &Request<Vec<u8>>) -> HttpResult {
        let params = RawParams::parse(req.uri().query().unwrap_or_default());
        let query = translate(&params);

        let total = self.store.count(&query.filter)?;
        let records = self.store.find(&query.filter, &query.find_options())?;
        tracing::debug!(
            filter = %query.filter,
            total,
            returned = records.len(),
            "listed bootcamps"
        );

        Ok(json_response(
            StatusCode::OK,
            &json!({
                "success": true,
                "count": records.len(),
                "pagination": query.pagination(total),
                "data": documents_to_json(&records),
            }),
        ))
    }

    fn get(&self, id: &str) -> HttpResult {
        match self.store.find_by_id(id)? {
            Lookup::Found(doc) => Ok(data_response(StatusCode::OK, &doc)),
            Lookup::NotFound => Err(BootcampHttpError::NotFound(id.to_string())),
        }
    }

    fn within_radius(&self, zipcode: &str, distance: &str) -> HttpResult {
        let miles: f64 = distance
            .trim()
            .parse()
            .ok()
            .filter(|d: &f64| d.is_finite() && *d >= 0.0)
            .ok_or_else(|| {
                BootcampHttpError::BadRequest(format!(
                    "Distance must be a non-negative number, got {distance}"
                ))
            })?;
        let center = self
            .geocoder
            .geocode(zipcode)?
            .ok_or_else(|| BootcampHttpError::ZipcodeNotFound(zipcode.to_string()))?;

        let options = FindOptions {
            sort: vec![Sort::desc(DEFAULT_SORT_FIELD)],
            ..Default::default()
        };
        let records = self.store.find(&radius_filter(center, miles), &options)?;
        tracing::debug!(zipcode, miles, returned = records.len(), "radius search");

        Ok(json_response(
            StatusCode::OK,
            &json!({
                "success": true,
                "count": records.len(),
                "data": documents_to_json(&records),
            }),
        ))
    }

    // ── Write routes ────────────────────────────────────────────

    fn create(&self, req: &Request<Vec<u8>>) -> HttpResult {
        let doc = parse_body(req)?;
        let created = self.store.insert(doc)?;
        tracing::info!(id = %id_of(&created), "created bootcamp");
        Ok(data_response(StatusCode::CREATED, &created))
    }

    fn update(&self, id: &str, req: &Request<Vec<u8>>) -> HttpResult {
        let patch = parse_body(req)?;
        match self.store.update_by_id(id, patch)? {
            Lookup::Found(doc) => {
                tracing::info!(id, "updated bootcamp");
                Ok(data_response(StatusCode::OK, &doc))
            }
            Lookup::NotFound => Err(BootcampHttpError::NotFound(id.to_string())),
        }
    }

    fn delete(&self, id: &str) -> HttpResult {
        match self.store.delete_by_id(id)? {
            Lookup::Found(_) => {
                tracing::info!(id, "deleted bootcamp");
                Ok(json_response(
                    StatusCode::OK,
                    &json!({ "success": true, "data": {} }),
                ))
            }
            Lookup::NotFound => Err(BootcampHttpError::NotFound(id.to_string())),
        }
    }
}

fn parse_body(req: &Request<Vec<u8>>) -> Result<Document, BootcampHttpError> {
    if req.body().is_empty() {
        return Err(BootcampHttpError::BadRequest(
            "Request body must be a JSON object".into(),
        ));
    }
    serde_json::from_slice(req.body()).map_err(|e| BootcampHttpError::BadRequest(e.to_string()))
}

fn id_of(doc: &Document) -> String {
    doc.get_object_id("_id")
        .map(|oid| oid.to_hex())
        .unwrap_or_default()
}

fn data_response(status: StatusCode, doc: &Document) -> Response<Vec<u8>> {
    json_response(
        status,
        &json!({ "success": true, "data": document_to_json(doc) }),
    )
}

fn json_response(status: StatusCode, body: &Value) -> Response<Vec<u8>> {
    let mut response = Response::new(body.to_string().into_bytes());
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

fn error_response(status: StatusCode, message: &str) -> Response<Vec<u8>> {
    json_response(status, &json!({ "success": false, "message": message }))
}
