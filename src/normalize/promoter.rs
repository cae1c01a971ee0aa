use serde_json::Value;

use super::fields::{id_string, str_field, string_field};
use crate::types::PromoterView;

/// The forms a market's `promoter` field is stored in
#[derive(Debug, Clone, PartialEq)]
pub enum PromoterShape<'a> {
    /// A populated user document carrying its own `_id` / `id`
    Expanded { id: String, doc: &'a Value },
    /// A bare foreign key
    Reference(String),
    Missing,
}

impl<'a> PromoterShape<'a> {
    /// Expanded documents are checked before bare references. An
    /// extended-JSON `{"$oid": ...}` has no `_id` so it falls through to
    /// the reference case.
    pub fn detect(promoter: Option<&'a Value>) -> Self {
        let Some(promoter) = promoter else {
            return PromoterShape::Missing;
        };

        if promoter.is_object() {
            let own_id = promoter
                .get("_id")
                .and_then(id_string)
                .or_else(|| promoter.get("id").and_then(id_string));
            if let Some(id) = own_id {
                return PromoterShape::Expanded { id, doc: promoter };
            }
        }

        match id_string(promoter) {
            Some(id) => PromoterShape::Reference(id),
            None => PromoterShape::Missing,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PromoterShape::Expanded { .. } => "expanded",
            PromoterShape::Reference(_) => "reference",
            PromoterShape::Missing => "missing",
        }
    }

    /// Returns `(promoterId, promoter)`
    pub fn decode(self) -> (Option<String>, Option<PromoterView>) {
        match self {
            PromoterShape::Expanded { id, doc } => {
                let profile = doc.get("profile");
                let name = |key: &str| {
                    profile
                        .and_then(|p| str_field(p, key))
                        .or_else(|| str_field(doc, key))
                        .map(str::to_string)
                };

                let view = PromoterView {
                    id: id.clone(),
                    username: string_field(doc, "username"),
                    email: string_field(doc, "email"),
                    first_name: name("firstName"),
                    last_name: name("lastName"),
                    role: string_field(doc, "role"),
                };
                (Some(id), Some(view))
            }
            PromoterShape::Reference(id) => (Some(id), None),
            PromoterShape::Missing => (None, None),
        }
    }
}
