use super::error::StoreError;
use super::geometry::Submission;
use super::notify::{Confirm, Notifier};
use super::store::{ShapeStore, StoreResponse};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Success(String),
    Error(String),
}

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingNotifier {
    pub fn all(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify_success(&mut self, message: &str) {
        self.notices
            .lock()
            .unwrap()
            .push(Notice::Success(message.into()));
    }

    fn notify_error(&mut self, message: &str) {
        self.notices
            .lock()
            .unwrap()
            .push(Notice::Error(message.into()));
    }
}

#[derive(Clone)]
pub struct ScriptedConfirm {
    answer: bool,
    prompts: Arc<AtomicUsize>,
}

impl ScriptedConfirm {
    pub fn new(answer: bool) -> Self {
        ScriptedConfirm {
            answer,
            prompts: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn prompts(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&mut self, _prompt: &str) -> bool {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        self.answer
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Answer {
    Status(u16),
    Unreachable,
}

/// A real reqwest error, produced without touching the network.
pub fn transport_error() -> StoreError {
    let err = reqwest::Client::new()
        .post("not a url")
        .build()
        .unwrap_err();
    StoreError::Transport(err)
}

#[derive(Clone)]
pub struct MockStore {
    answer: Arc<Mutex<Answer>>,
    submissions: Arc<Mutex<Vec<Submission>>>,
}

impl MockStore {
    pub fn new(answer: Answer) -> Self {
        MockStore {
            answer: Arc::new(Mutex::new(answer)),
            submissions: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn answer(&self, answer: Answer) {
        *self.answer.lock().unwrap() = answer;
    }

    pub fn calls(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl ShapeStore for MockStore {
    async fn create(&self, submission: &Submission) -> Result<StoreResponse, StoreError> {
        self.submissions.lock().unwrap().push(submission.clone());
        let answer = *self.answer.lock().unwrap();
        match answer {
            Answer::Status(status) => Ok(StoreResponse { status }),
            Answer::Unreachable => Err(transport_error()),
        }
    }
}
