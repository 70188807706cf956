//! Batch processing for concurrent command handling
//!
//! This module provides the `BatchProcessor` struct, which applies a batch of
//! commands by partitioning it by card label and processing each card's
//! commands in its own tokio task.
//!
//! # Ordering
//!
//! Within a batch, each card's commands keep their file order because they
//! run sequentially in one task. Callers process batches one after another,
//! so the order also holds across batches.

use std::collections::HashMap;
use std::sync::Arc;

use super::engine::{log_outcome, CommandEngine};
use crate::types::{CardLabel, CommandRecord};

/// Applies batches of commands concurrently across cards
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    engine: Arc<CommandEngine>,
}

impl BatchProcessor {
    /// Create a processor driving `engine`
    pub fn new(engine: Arc<CommandEngine>) -> Self {
        Self { engine }
    }

    /// Group a batch by card label, keeping each card's commands in order
    pub fn partition_by_card(
        &self,
        batch: Vec<CommandRecord>,
    ) -> HashMap<CardLabel, Vec<CommandRecord>> {
        let mut card_batches: HashMap<CardLabel, Vec<CommandRecord>> = HashMap::new();

        for record in batch {
            card_batches
                .entry(record.card.clone())
                .or_default()
                .push(record);
        }

        card_batches
    }

    /// Apply one card's commands in order
    ///
    /// Returns how many of them were accepted.
    pub async fn process_card_commands(&self, commands: Vec<CommandRecord>) -> usize {
        let mut accepted = 0;

        for record in commands {
            let result = self.engine.process(&record);
            log_outcome(&record, &result);
            if result.is_ok() {
                accepted += 1;
            }
        }

        accepted
    }

    /// Apply a batch, one task per card
    ///
    /// # Returns
    ///
    /// The number of accepted commands across every card task that completed
    pub async fn process_batch(&self, batch: Vec<CommandRecord>) -> usize {
        let card_batches = self.partition_by_card(batch);

        let mut tasks = Vec::with_capacity(card_batches.len());
        for (_card, commands) in card_batches {
            let processor = self.clone();
            tasks.push(tokio::spawn(async move {
                processor.process_card_commands(commands).await
            }));
        }

        let mut accepted = 0;
        for task in tasks {
            match task.await {
                Ok(card_accepted) => accepted += card_accepted,
                Err(e) => {
                    tracing::error!(error = %e, "Card task failed");
                }
            }
        }

        accepted
    }
}
