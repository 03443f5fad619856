use crate::http::{HTTPError, HTTPResult, Service};
use std::collections::HashMap;
use std::fs;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time;

pub fn load_data(file: &str) -> String {
    fs::read_to_string(format!("tests/data/{file}.json")).expect("could not find test data")
}

pub fn load_output(filename: &str) -> String {
    let filename = format!("tests/output/{filename}.out");
    String::from(
        fs::read_to_string(&filename)
            .expect(&format!("could not load test data from {filename}"))
            .trim_end(),
    )
}

/// A canned answer to a single endpoint.
#[derive(Clone, Debug)]
pub enum Reply {
    /// A successful response with this body.
    Body(String),

    /// An unsuccessful response with this status and body.
    Status(u16, String),

    /// A response that never arrives in any reasonable amount of time.
    Stall,
}

impl Reply {
    pub fn fixture(file: &str) -> Self {
        Reply::Body(load_data(file))
    }
}

/// A deterministic service that answers from canned replies and records
/// every endpoint it is asked for.
///
/// Clones share the same request log, so a test can keep a clone around
/// to inspect requests after handing the service to a client.
#[derive(Clone, Debug, Default)]
pub struct TestService {
    replies: HashMap<String, Reply>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl TestService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, endpoint: &str, reply: Reply) -> Self {
        self.replies.insert(endpoint.to_string(), reply);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Service for TestService {
    async fn get(&self, endpoint: &str) -> HTTPResult<String> {
        self.requests.lock().unwrap().push(endpoint.to_string());
        match self.replies.get(endpoint) {
            Some(Reply::Body(body)) => Ok(body.clone()),
            Some(Reply::Status(status, body)) => Err(HTTPError::Api {
                status: *status,
                body: body.clone(),
            }),
            Some(Reply::Stall) => {
                time::sleep(Duration::from_secs(24 * 60 * 60)).await;
                Ok(String::from("[]"))
            }
            None => Err(HTTPError::Api {
                status: 404,
                body: format!("no reply for {endpoint}"),
            }),
        }
    }
}
