// ABOUTME: Placeholder reply generation for assistant messages
// ABOUTME: Produces a canned answer plus a randomly filled table as structured payload
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Assistant reply generation.
//!
//! There is no model behind the chat endpoint: [`PlaceholderReplyGenerator`]
//! answers every question with a short sentence and a random sales-style
//! table (`headers`, `rows`, `metadata`). Callers must not rely on the values.

use crate::models::StructuredPayload;
use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::json;

/// Reply text and optional structured payload for an assistant message
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedReply {
    /// Text content
    pub content: String,
    /// Structured document attached to the reply
    pub payload: Option<StructuredPayload>,
}

/// Produces assistant replies for user questions
pub trait ReplyGenerator: Send + Sync {
    /// Generate a reply to `question`
    fn generate(&self, question: &str) -> GeneratedReply;
}

const TABLE_HEADERS: [&str; 4] = ["Region", "Product", "Units Sold", "Revenue"];
const REGIONS: [&str; 5] = ["North", "South", "East", "West", "Central"];
const PRODUCTS: [&str; 6] = ["Widget", "Gadget", "Gizmo", "Sprocket", "Doohickey", "Thingamajig"];
const OPENERS: [&str; 3] = [
    "Here is what I found for",
    "These are the latest figures for",
    "I pulled together a summary for",
];

/// Random table generator standing in for a real assistant
#[derive(Debug, Clone)]
pub struct PlaceholderReplyGenerator {
    min_rows: usize,
    max_rows: usize,
}

impl Default for PlaceholderReplyGenerator {
    fn default() -> Self {
        Self {
            min_rows: 3,
            max_rows: 8,
        }
    }
}

impl PlaceholderReplyGenerator {
    /// Generator producing between `min_rows` and `max_rows` rows (inclusive)
    #[must_use]
    pub fn with_row_range(min_rows: usize, max_rows: usize) -> Self {
        let min_rows = min_rows.max(1);
        Self {
            min_rows,
            max_rows: max_rows.max(min_rows),
        }
    }

    fn random_table(&self, rng: &mut impl Rng) -> StructuredPayload {
        let row_count = rng.gen_range(self.min_rows..=self.max_rows);
        let rows: Vec<serde_json::Value> = (0..row_count)
            .map(|_| {
                let units: u32 = rng.gen_range(10..=500);
                let unit_price: f64 = rng.gen_range(5.0..=120.0);
                let revenue = (f64::from(units) * unit_price * 100.0).round() / 100.0;
                json!([
                    REGIONS.choose(rng).copied().unwrap_or("North"),
                    PRODUCTS.choose(rng).copied().unwrap_or("Widget"),
                    units,
                    revenue,
                ])
            })
            .collect();

        json!({
            "headers": TABLE_HEADERS,
            "rows": rows,
            "metadata": {
                "rowCount": row_count,
                "generatedAt": Utc::now().to_rfc3339(),
                "source": "placeholder",
            },
        })
    }
}

impl ReplyGenerator for PlaceholderReplyGenerator {
    fn generate(&self, question: &str) -> GeneratedReply {
        let mut rng = rand::thread_rng();
        let opener = OPENERS.choose(&mut rng).copied().unwrap_or(OPENERS[0]);

        GeneratedReply {
            content: format!("{opener} \"{}\".", question.trim()),
            payload: Some(self.random_table(&mut rng)),
        }
    }
}
