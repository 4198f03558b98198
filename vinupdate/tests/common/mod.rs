//! In-memory update server shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{self, Read};
use std::sync::Mutex;

use vinupdate::http::{BodyStream, HeadResponse, HttpClient, HttpResponse};
use vinupdate::UpdateResult;

/// Byte every served resource is filled with.
pub const FILL: u8 = 0xA5;

/// A request observed by the server.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Post { url: String, payload: String },
    Head { url: String },
    Get { url: String, range_start: Option<u64> },
}

/// A downloadable resource of `len` bytes, generated on the fly.
#[derive(Debug, Clone)]
struct Resource {
    len: u64,
    fail_after: Option<u64>,
}

/// Reader that fails once its inner reader is exhausted.
struct ThenFail<R>(R);

impl<R: Read> Read for ThenFail<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.0.read(buf)? {
            0 => Err(io::Error::new(
                io::ErrorKind::ConnectionAborted,
                "peer went away",
            )),
            n => Ok(n),
        }
    }
}

/// Fake update service: answers the discovery POST with a fixed body and
/// serves resources with HEAD and ranged GET support.
#[derive(Default)]
pub struct FakeUpdateServer {
    query_status: u16,
    query_body: String,
    resources: Mutex<HashMap<String, Resource>>,
    requests: Mutex<Vec<Request>>,
}

impl FakeUpdateServer {
    pub fn new(query_body: impl Into<String>) -> Self {
        Self {
            query_status: 200,
            query_body: query_body.into(),
            ..Default::default()
        }
    }

    pub fn with_resource(self, url: &str, len: u64) -> Self {
        self.resources.lock().unwrap().insert(
            url.to_string(),
            Resource {
                len,
                fail_after: None,
            },
        );
        self
    }

    /// Make the next GETs of `url` drop the connection after `bytes` bytes.
    pub fn fail_after(&self, url: &str, bytes: Option<u64>) {
        if let Some(resource) = self.resources.lock().unwrap().get_mut(url) {
            resource.fail_after = bytes;
        }
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn gets(&self) -> Vec<Option<u64>> {
        self.requests()
            .into_iter()
            .filter_map(|r| match r {
                Request::Get { range_start, .. } => Some(range_start),
                _ => None,
            })
            .collect()
    }

    fn resource(&self, url: &str) -> Option<Resource> {
        self.resources.lock().unwrap().get(url).cloned()
    }
}

impl HttpClient for FakeUpdateServer {
    fn post_json(&self, url: &str, payload: Vec<u8>) -> UpdateResult<HttpResponse> {
        self.requests.lock().unwrap().push(Request::Post {
            url: url.to_string(),
            payload: String::from_utf8_lossy(&payload).into_owned(),
        });
        Ok(HttpResponse {
            status: self.query_status,
            body: self.query_body.as_bytes().to_vec(),
        })
    }

    fn head(&self, url: &str) -> UpdateResult<HeadResponse> {
        self.requests.lock().unwrap().push(Request::Head {
            url: url.to_string(),
        });
        Ok(match self.resource(url) {
            Some(r) => HeadResponse {
                status: 200,
                content_length: Some(r.len),
            },
            None => HeadResponse {
                status: 404,
                content_length: None,
            },
        })
    }

    fn get(&self, url: &str, range_start: Option<u64>) -> UpdateResult<BodyStream> {
        self.requests.lock().unwrap().push(Request::Get {
            url: url.to_string(),
            range_start,
        });
        let Some(resource) = self.resource(url) else {
            return Ok(BodyStream {
                status: 404,
                content_length: None,
                body: Box::new(io::empty()),
            });
        };

        let start = range_start.unwrap_or(0);
        if start > resource.len {
            return Ok(BodyStream {
                status: 416,
                content_length: None,
                body: Box::new(io::empty()),
            });
        }

        let remaining = resource.len - start;
        let body: Box<dyn Read + Send> = match resource.fail_after {
            Some(limit) => Box::new(ThenFail(io::repeat(FILL).take(limit.min(remaining)))),
            None => Box::new(io::repeat(FILL).take(remaining)),
        };

        Ok(BodyStream {
            status: if range_start.is_some() { 206 } else { 200 },
            content_length: Some(remaining),
            body,
        })
    }
}

/// Discovery response for the reference vehicle: NAC v1.0 → v2.0 and
/// RCC v3.0 → v3.1 with a license, returned in reverse request order.
pub fn reference_response(nac_size: u64, rcc_size: u64) -> String {
    format!(
        r#"{{
    "requestResult": "OK",
    "installerURL": "https%3A%2F%2Fupdates.test%2Finstaller%2Fsetup.exe",
    "vin": "VF3CCHNZTHT014827",
    "software": [
        {{
            "softwareType": "rcc-firmware",
            "updateRequestResult": "OK",
            "currentSoftwareVersion": "v3.0",
            "update": [{{
                "updateId": "rcc-3.1",
                "updateSize": "{rcc_size}",
                "updateVersion": "v3.1",
                "updateDate": "2021-03-01",
                "updateURL": "https://cdn.updates.test/rcc-v3.1.tar",
                "licenseURL": "https://cdn.updates.test/rcc-license.pdf"
            }}]
        }},
        {{
            "softwareType": "ovip-int-firmware-version",
            "updateRequestResult": "OK",
            "currentSoftwareVersion": "v1.0",
            "update": [{{
                "updateId": "nac-2.0",
                "updateSize": "{nac_size}",
                "updateVersion": "v2.0",
                "updateDate": "2021-02-01",
                "updateURL": "https://cdn.updates.test/nac-v2.0.tar",
                "licenseURL": ""
            }}]
        }}
    ]
}}"#
    )
}

pub const NAC_URL: &str = "https://cdn.updates.test/nac-v2.0.tar";
pub const RCC_URL: &str = "https://cdn.updates.test/rcc-v3.1.tar";
pub const LICENSE_URL: &str = "https://cdn.updates.test/rcc-license.pdf";
