//! Batch processing of input records.
//!
//! Records are sent strictly one after another in input order. Each record
//! yields exactly one [`OutputRecord`] tagged with its input index, unless
//! the batch aborts on a failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::client::TaskeyClient;
use crate::error::{BatchError, TaskeyError};
use crate::fields::RecordParams;
use crate::operation::Operation;

/// One record to send: the operation plus its field values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputRecord {
    /// Raw operation value; parsed per record so a bad value only fails
    /// that record.
    pub operation: String,
    #[serde(flatten)]
    pub params: RecordParams,
}

impl InputRecord {
    #[must_use]
    pub fn new(operation: Operation, params: RecordParams) -> Self {
        Self {
            operation: operation.as_str().to_string(),
            params,
        }
    }
}

/// Index of the input record an output belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairedItem {
    pub item: usize,
}

/// Result payload of one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutputJson {
    /// Taskey accepted the record
    Success { success: bool, response: Value },
    /// The record failed and continue-on-fail was on
    Error { error: String },
}

/// Output for one input record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputRecord {
    pub json: OutputJson,
    pub paired_item: PairedItem,
}

impl OutputRecord {
    #[must_use]
    pub const fn success(item: usize, response: Value) -> Self {
        Self {
            json: OutputJson::Success {
                success: true,
                response,
            },
            paired_item: PairedItem { item },
        }
    }

    #[must_use]
    pub const fn error(item: usize, error: String) -> Self {
        Self {
            json: OutputJson::Error { error },
            paired_item: PairedItem { item },
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.json, OutputJson::Success { .. })
    }
}

/// Sends batches of records through a [`TaskeyClient`].
#[derive(Clone)]
pub struct RecordProcessor {
    client: TaskeyClient,
    continue_on_fail: bool,
}

impl RecordProcessor {
    /// Create a processor that aborts the batch on the first failure.
    #[must_use]
    pub const fn new(client: TaskeyClient) -> Self {
        Self {
            client,
            continue_on_fail: false,
        }
    }

    /// Turn failed records into error outputs instead of aborting.
    #[must_use]
    pub fn continue_on_fail(mut self, enabled: bool) -> Self {
        self.continue_on_fail = enabled;
        self
    }

    /// Process one record.
    ///
    /// # Errors
    /// Returns error if the operation is unknown, credentials cannot be
    /// resolved, or the request fails.
    pub async fn process_record(&self, record: &InputRecord) -> Result<Value, TaskeyError> {
        let operation: Operation = record.operation.parse()?;
        self.client.send(operation, &record.params).await
    }

    /// Process a batch in input order.
    ///
    /// # Errors
    /// Returns the first failure, tagged with its index and carrying the
    /// outputs of earlier records, when continue-on-fail is off.
    pub async fn process_batch(
        &self,
        records: &[InputRecord],
    ) -> Result<Vec<OutputRecord>, BatchError> {
        info!(
            records = records.len(),
            continue_on_fail = self.continue_on_fail,
            "Processing Taskey batch"
        );

        let mut outputs = Vec::with_capacity(records.len());

        for (item, record) in records.iter().enumerate() {
            match self.process_record(record).await {
                Ok(response) => {
                    debug!(item, operation = %record.operation, "Record sent");
                    outputs.push(OutputRecord::success(item, response));
                }
                Err(e) if self.continue_on_fail => {
                    warn!(
                        item,
                        operation = %record.operation,
                        error = %e,
                        "Record failed, continuing"
                    );
                    outputs.push(OutputRecord::error(item, e.to_string()));
                }
                Err(e) => {
                    warn!(
                        item,
                        operation = %record.operation,
                        error = %e,
                        "Record failed, aborting batch"
                    );
                    return Err(BatchError {
                        item,
                        source: e,
                        outputs,
                    });
                }
            }
        }

        info!(
            outputs = outputs.len(),
            failed = outputs.iter().filter(|o| !o.is_success()).count(),
            "Taskey batch complete"
        );

        Ok(outputs)
    }
}
