use serde::Deserialize;

use crate::{ElectionId, ServerType};

/// The fields of a `hello` (legacy `isMaster`) reply that server discovery looks at.
///
/// Everything else in the reply is ignored. Missing fields take their default so partial
/// replies from old servers still deserialize.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct HelloReply {
    pub ok: f64,
    #[serde(alias = "ismaster")]
    pub is_writable_primary: Option<bool>,
    pub secondary: Option<bool>,
    pub arbiter_only: Option<bool>,
    pub hidden: Option<bool>,
    #[serde(rename = "isreplicaset")]
    pub is_replica_set: Option<bool>,
    pub msg: Option<String>,
    pub set_name: Option<String>,
    pub set_version: Option<i32>,
    pub election_id: Option<ElectionId>,
    pub me: Option<String>,
    pub primary: Option<String>,
    pub hosts: Vec<String>,
    pub passives: Vec<String>,
    pub arbiters: Vec<String>,
    pub min_wire_version: i32,
    pub max_wire_version: i32,
    pub logical_session_timeout_minutes: Option<u32>,
}

impl HelloReply {
    /// Works out which role the replying server plays.
    pub fn server_type(&self) -> ServerType {
        if self.ok == 0.0 {
            return ServerType::Unknown;
        }

        if self.is_replica_set.unwrap_or(false) {
            return ServerType::RSGhost;
        }

        if self.msg.as_deref() == Some("isdbgrid") {
            return ServerType::Mongos;
        }

        if self.set_name.is_some() {
            // Hidden members never take reads, whatever role they report.
            return if self.hidden.unwrap_or(false) {
                ServerType::RSOther
            } else if self.is_writable_primary.unwrap_or(false) {
                ServerType::RSPrimary
            } else if self.secondary.unwrap_or(false) {
                ServerType::RSSecondary
            } else if self.arbiter_only.unwrap_or(false) {
                ServerType::RSArbiter
            } else {
                ServerType::RSOther
            };
        }

        ServerType::Standalone
    }

    /// Every member the server reports: hosts, passives and arbiters, in that order.
    pub fn all_hosts(&self) -> impl Iterator<Item = &str> {
        self.hosts
            .iter()
            .chain(self.passives.iter())
            .chain(self.arbiters.iter())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(json: &str) -> HelloReply {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn failed_reply_is_unknown() {
        assert_eq!(reply(r#"{"ok": 0}"#).server_type(), ServerType::Unknown);
    }

    #[test]
    fn plain_reply_is_standalone() {
        let hello = reply(r#"{"ok": 1, "ismaster": true, "maxWireVersion": 9}"#);

        assert_eq!(hello.server_type(), ServerType::Standalone);
        assert_eq!(hello.max_wire_version, 9);
    }

    #[test]
    fn isdbgrid_is_mongos() {
        let hello = reply(r#"{"ok": 1, "ismaster": true, "msg": "isdbgrid"}"#);

        assert_eq!(hello.server_type(), ServerType::Mongos);
    }

    #[test]
    fn replica_set_roles() {
        let primary = reply(r#"{"ok": 1, "isWritablePrimary": true, "setName": "rs0"}"#);
        let secondary = reply(r#"{"ok": 1, "secondary": true, "setName": "rs0"}"#);
        let arbiter = reply(r#"{"ok": 1, "arbiterOnly": true, "setName": "rs0"}"#);
        let other = reply(r#"{"ok": 1, "hidden": true, "setName": "rs0"}"#);
        let ghost = reply(r#"{"ok": 1, "isreplicaset": true}"#);

        assert_eq!(primary.server_type(), ServerType::RSPrimary);
        assert_eq!(secondary.server_type(), ServerType::RSSecondary);
        assert_eq!(arbiter.server_type(), ServerType::RSArbiter);
        assert_eq!(other.server_type(), ServerType::RSOther);
        assert_eq!(ghost.server_type(), ServerType::RSGhost);
    }

    #[test]
    fn hidden_member_is_other_and_not_readable() {
        let hidden_secondary =
            reply(r#"{"ok": 1, "secondary": true, "hidden": true, "setName": "rs0"}"#);
        let hidden_primary =
            reply(r#"{"ok": 1, "isWritablePrimary": true, "hidden": true, "setName": "rs0"}"#);

        assert_eq!(hidden_secondary.server_type(), ServerType::RSOther);
        assert!(!hidden_secondary.server_type().is_readable());
        assert_eq!(hidden_primary.server_type(), ServerType::RSOther);
    }

    #[test]
    fn all_hosts_chains_member_lists() {
        let hello = reply(
            r#"{"ok": 1, "setName": "rs0", "hosts": ["a:1"], "passives": ["b:1"], "arbiters": ["c:1"]}"#,
        );

        assert_eq!(hello.all_hosts().collect::<Vec<_>>(), vec!["a:1", "b:1", "c:1"]);
    }
}
