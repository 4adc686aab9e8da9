//! Per-record input fields and form body construction.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::credentials::Credentials;
use crate::operation::Operation;

/// User-declared extra form field, appended after the fixed fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalField {
    #[serde(default)]
    pub field_name: String,
    #[serde(default)]
    pub field_value: String,
}

impl AdditionalField {
    #[must_use]
    pub fn new(field_name: impl Into<String>, field_value: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            field_value: field_value.into(),
        }
    }
}

/// Named values for one record. Only the subset used by the chosen
/// operation is read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordParams {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub comment: String,
    /// Lead status
    pub status: String,
    /// Lead owner
    pub user_id: String,
    pub source: String,
    pub campaign: String,
    pub product_name: String,
    /// Purchase amount; sent only when positive
    pub amount: f64,
    pub title: String,
    /// Task or meeting description
    pub body: String,
    /// Assignee for tasks and meetings
    pub task_user_id: String,
    pub follower_user_id: String,
    /// Meeting start, `d-m-Y H:i`
    pub start_date: String,
    /// Meeting end, `d-m-Y H:i`
    pub end_date: String,
    pub follow_id: String,
    pub additional_fields: Vec<AdditionalField>,
}

/// Which record value feeds a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Name,
    Comment,
    Status,
    UserId,
    LeadSource,
    Campaign,
    ProductName,
    Amount,
    Title,
    Body,
    TaskUserId,
    FollowerUserId,
    StartDate,
    EndDate,
    FollowId,
}

impl Source {
    /// Value to send, or `None` when the field is left out.
    fn value(self, params: &RecordParams) -> Option<String> {
        let text = match self {
            Self::Amount => {
                return (params.amount > 0.0).then(|| params.amount.to_string());
            }
            Self::Name => &params.name,
            Self::Comment => &params.comment,
            Self::Status => &params.status,
            Self::UserId => &params.user_id,
            Self::LeadSource => &params.source,
            Self::Campaign => &params.campaign,
            Self::ProductName => &params.product_name,
            Self::Title => &params.title,
            Self::Body => &params.body,
            Self::TaskUserId => &params.task_user_id,
            Self::FollowerUserId => &params.follower_user_id,
            Self::StartDate => &params.start_date,
            Self::EndDate => &params.end_date,
            Self::FollowId => &params.follow_id,
        };
        (!text.is_empty()).then(|| text.clone())
    }
}

const LEAD_FIELDS: &[(&str, Source)] = &[
    ("name", Source::Name),
    ("comment", Source::Comment),
    ("status", Source::Status),
    ("user_id", Source::UserId),
    ("source", Source::LeadSource),
    ("campaign", Source::Campaign),
];

const PURCHASE_FIELDS: &[(&str, Source)] = &[
    ("name", Source::Name),
    ("productname", Source::ProductName),
    ("amount", Source::Amount),
    ("comment", Source::Comment),
];

const TASK_FIELDS: &[(&str, Source)] = &[
    ("name", Source::Name),
    ("title", Source::Title),
    ("body", Source::Body),
    ("user_id", Source::TaskUserId),
    ("user_id_follower", Source::FollowerUserId),
    ("comment", Source::Comment),
];

const MEETING_FIELDS: &[(&str, Source)] = &[
    ("title", Source::Title),
    ("body", Source::Body),
    ("start_date", Source::StartDate),
    ("end_date", Source::EndDate),
    ("user_id", Source::TaskUserId),
    ("user_id_follower", Source::FollowerUserId),
    ("follow_id", Source::FollowId),
    ("comment", Source::Comment),
];

const fn operation_fields(operation: Operation) -> &'static [(&'static str, Source)] {
    match operation {
        Operation::AddLead => LEAD_FIELDS,
        Operation::AddPurchase => PURCHASE_FIELDS,
        Operation::AddTask => TASK_FIELDS,
        Operation::AddMeeting => MEETING_FIELDS,
    }
}

/// Build the `application/x-www-form-urlencoded` body for one record.
///
/// Order is `api_key`, `phone`, the email field, the operation's own fields,
/// then well-formed additional fields in declaration order.
#[must_use]
pub fn build_body(
    operation: Operation,
    credentials: &Credentials,
    params: &RecordParams,
) -> String {
    let mut form = form_urlencoded::Serializer::new(String::new());
    form.append_pair("api_key", &credentials.api_key);

    if !params.phone.is_empty() {
        form.append_pair("phone", &params.phone);
    }
    if !params.email.is_empty() {
        form.append_pair(operation.email_field(), &params.email);
    }

    for (wire_name, source) in operation_fields(operation) {
        if let Some(value) = source.value(params) {
            form.append_pair(wire_name, &value);
        }
    }

    for field in &params.additional_fields {
        if !field.field_name.is_empty() && !field.field_value.is_empty() {
            form.append_pair(&field.field_name, &field.field_value);
        }
    }

    form.finish()
}

/// Body of the credential check request.
#[must_use]
pub fn build_test_body(credentials: &Credentials) -> String {
    form_urlencoded::Serializer::new(String::new())
        .append_pair("api_key", &credentials.api_key)
        .append_pair("test", "1")
        .finish()
}
