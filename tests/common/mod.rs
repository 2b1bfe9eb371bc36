#![allow(dead_code)]

use std::sync::Mutex;

use chrono::{NaiveDate, NaiveDateTime};

use closings::citations::GroundingCitation;
use closings::error::{Error, Result};
use closings::gemini::{Generation, GenerationClient};

/// Replays canned generations and records every prompt it was sent.
pub struct FakeClient {
    responses: Mutex<Vec<Result<Generation>>>,
    prompts: Mutex<Vec<String>>,
}

impl FakeClient {
    pub fn new(responses: Vec<Result<Generation>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn answering(text: &str, citations: Vec<GroundingCitation>) -> Self {
        Self::new(vec![Ok(Generation {
            text: text.to_string(),
            citations,
        })])
    }

    pub fn failing(message: &str) -> Self {
        Self::new(vec![Err(Error::Generation(message.to_string()))])
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl GenerationClient for FakeClient {
    fn generate(&self, prompt: &str) -> Result<Generation> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Err(Error::Generation("no more fake responses".to_string()))
        } else {
            responses.remove(0)
        }
    }
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

/// 14:00 on Monday, December 15, 2025.
pub fn monday_afternoon() -> NaiveDateTime {
    at(2025, 12, 15, 14, 0)
}
