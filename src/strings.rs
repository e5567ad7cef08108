//! Message keys and the string resolver
//!
//! Every label the task panel shows is looked up by a [`MessageKey`] and
//! interpolated with named parameters. [`MessageCatalog`] is the built-in
//! English resolver; deployments can override individual templates from
//! the config file.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Catalog ids for every string the task panel needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageKey {
    TaskWaitingStatus,
    TaskFinishedStatus,
    TaskCanceledStatus,
    TaskCancelingStatus,
    TaskFailedStatus,
    TaskUnknownStatus,
    EstablishingConnectionStatus,
    RemotelyPreparingDataStatus,
    ReceivingDataStatus,
    LocallyIntegratingDataStatus,
    LocallyPreparingDataStatus,
    SendingDataStatus,
    RemotelyIntegratingDataStatus,
    SyncStepAndDescription,
    SyncBytesSentAndReceived,
    NameWithIdInParens,
    QuotedPhrase,
    SyncFacilityTaskLabel,
    RemoveFacilityTaskLabel,
    ImportFacilityTaskLabel,
    TaskStartedByLabel,
    RemovingFacilityStatus,
    ImportFailedStatus,
    ImportSuccessStatus,
}

impl MessageKey {
    pub fn id(self) -> &'static str {
        match self {
            Self::TaskWaitingStatus => "taskWaitingStatus",
            Self::TaskFinishedStatus => "taskFinishedStatus",
            Self::TaskCanceledStatus => "taskCanceledStatus",
            Self::TaskCancelingStatus => "taskCancelingStatus",
            Self::TaskFailedStatus => "taskFailedStatus",
            Self::TaskUnknownStatus => "taskUnknownStatus",
            Self::EstablishingConnectionStatus => "establishingConnectionStatus",
            Self::RemotelyPreparingDataStatus => "remotelyPreparingDataStatus",
            Self::ReceivingDataStatus => "receivingDataStatus",
            Self::LocallyIntegratingDataStatus => "locallyIntegratingDataStatus",
            Self::LocallyPreparingDataStatus => "locallyPreparingDataStatus",
            Self::SendingDataStatus => "sendingDataStatus",
            Self::RemotelyIntegratingDataStatus => "remotelyIntegratingDataStatus",
            Self::SyncStepAndDescription => "syncStepAndDescription",
            Self::SyncBytesSentAndReceived => "syncBytesSentAndReceived",
            Self::NameWithIdInParens => "nameWithIdInParens",
            Self::QuotedPhrase => "quotedPhrase",
            Self::SyncFacilityTaskLabel => "syncFacilityTaskLabel",
            Self::RemoveFacilityTaskLabel => "removeFacilityTaskLabel",
            Self::ImportFacilityTaskLabel => "importFacilityTaskLabel",
            Self::TaskStartedByLabel => "taskStartedByLabel",
            Self::RemovingFacilityStatus => "removingFacilityStatus",
            Self::ImportFailedStatus => "importFailedStatus",
            Self::ImportSuccessStatus => "importSuccessStatus",
        }
    }
}

/// Resolves a message key and its named parameters to display text
pub trait StringResolver {
    fn resolve(&self, key: MessageKey, params: &[(&str, &str)]) -> String;
}

impl<R: StringResolver + ?Sized> StringResolver for &R {
    fn resolve(&self, key: MessageKey, params: &[(&str, &str)]) -> String {
        (**self).resolve(key, params)
    }
}

/// Template-based resolver with English defaults
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    templates: HashMap<MessageKey, String>,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::english()
    }
}

impl MessageCatalog {
    /// An empty catalog; every key resolves to its id.
    pub fn empty() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    pub fn english() -> Self {
        use MessageKey::*;

        let templates = [
            (TaskWaitingStatus, "Waiting"),
            (TaskFinishedStatus, "Finished"),
            (TaskCanceledStatus, "Canceled"),
            (TaskCancelingStatus, "Canceling"),
            (TaskFailedStatus, "Failed"),
            (TaskUnknownStatus, "Unknown"),
            (EstablishingConnectionStatus, "Establishing connection"),
            (RemotelyPreparingDataStatus, "Remotely preparing data"),
            (ReceivingDataStatus, "Receiving data"),
            (LocallyIntegratingDataStatus, "Locally integrating received data"),
            (LocallyPreparingDataStatus, "Locally preparing data to send"),
            (SendingDataStatus, "Sending data"),
            (RemotelyIntegratingDataStatus, "Remotely integrating data"),
            (SyncStepAndDescription, "Step {step} of {total}: {description}"),
            (SyncBytesSentAndReceived, "{bytesSent} sent • {bytesReceived} received"),
            (NameWithIdInParens, "{name} ({id})"),
            (QuotedPhrase, "“{phrase}”"),
            (SyncFacilityTaskLabel, "Sync '{facilityName}'"),
            (RemoveFacilityTaskLabel, "Remove '{facilityName}'"),
            (ImportFacilityTaskLabel, "Import '{facilityName}'"),
            (TaskStartedByLabel, "Started by '{username}'"),
            (RemovingFacilityStatus, "Removing facility"),
            (ImportFailedStatus, "Failed to import '{facilityName}'"),
            (ImportSuccessStatus, "'{facilityName}' successfully imported to this device"),
        ];

        Self {
            templates: templates
                .into_iter()
                .map(|(key, template)| (key, template.to_string()))
                .collect(),
        }
    }

    /// Replace individual templates, keeping the rest
    pub fn with_overrides(mut self, overrides: &HashMap<MessageKey, String>) -> Self {
        for (key, template) in overrides {
            self.templates.insert(*key, template.clone());
        }
        self
    }

    pub fn template(&self, key: MessageKey) -> Option<&str> {
        self.templates.get(&key).map(String::as_str)
    }
}

impl StringResolver for MessageCatalog {
    fn resolve(&self, key: MessageKey, params: &[(&str, &str)]) -> String {
        match self.template(key) {
            Some(template) => interpolate(template, params),
            None => {
                tracing::warn!(key = key.id(), "No template for message key");
                key.id().to_string()
            }
        }
    }
}

/// Substitute `{name}` placeholders. Unknown placeholders stay verbatim.
fn interpolate(template: &str, params: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };

        let name = &after[..close];
        match params.iter().find(|(param, _)| *param == name) {
            Some((_, value)) => out.push_str(value),
            None => {
                tracing::debug!(placeholder = name, "Unfilled placeholder");
                out.push_str(&rest[open..open + close + 2]);
            }
        }
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_covers_every_key() {
        let catalog = MessageCatalog::english();
        let keys: Vec<MessageKey> = serde_json::from_str(
            r#"["taskWaitingStatus","taskFinishedStatus","taskCanceledStatus",
                "taskCancelingStatus","taskFailedStatus","taskUnknownStatus",
                "establishingConnectionStatus","remotelyPreparingDataStatus",
                "receivingDataStatus","locallyIntegratingDataStatus",
                "locallyPreparingDataStatus","sendingDataStatus",
                "remotelyIntegratingDataStatus","syncStepAndDescription",
                "syncBytesSentAndReceived","nameWithIdInParens","quotedPhrase",
                "syncFacilityTaskLabel","removeFacilityTaskLabel",
                "importFacilityTaskLabel","taskStartedByLabel",
                "removingFacilityStatus","importFailedStatus","importSuccessStatus"]"#,
        )
        .unwrap();

        for key in keys {
            assert!(catalog.template(key).is_some(), "missing {}", key.id());
        }
    }

    #[test]
    fn test_key_id_matches_serde_name() {
        let json = serde_json::to_string(&MessageKey::SyncStepAndDescription).unwrap();
        assert_eq!(json, format!("\"{}\"", MessageKey::SyncStepAndDescription.id()));
    }

    #[test]
    fn test_interpolation() {
        let catalog = MessageCatalog::english();
        let msg = catalog.resolve(
            MessageKey::SyncStepAndDescription,
            &[("step", "3"), ("total", "7"), ("description", "Receiving data")],
        );
        assert_eq!(msg, "Step 3 of 7: Receiving data");
    }

    #[test]
    fn test_missing_param_left_verbatim() {
        let catalog = MessageCatalog::english();
        let msg = catalog.resolve(MessageKey::TaskStartedByLabel, &[]);
        assert_eq!(msg, "Started by '{username}'");
        assert_eq!(interpolate("open { brace", &[]), "open { brace");
    }

    #[test]
    fn test_overrides_replace_single_template() {
        let overrides = HashMap::from([(MessageKey::TaskFailedStatus, "Broken".to_string())]);
        let catalog = MessageCatalog::english().with_overrides(&overrides);

        assert_eq!(catalog.resolve(MessageKey::TaskFailedStatus, &[]), "Broken");
        assert_eq!(catalog.resolve(MessageKey::TaskFinishedStatus, &[]), "Finished");
    }

    #[test]
    fn test_missing_template_resolves_to_id() {
        let catalog = MessageCatalog::empty();
        assert_eq!(
            catalog.resolve(MessageKey::QuotedPhrase, &[("phrase", "x")]),
            "quotedPhrase"
        );
    }
}
