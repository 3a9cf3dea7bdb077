//! Serde representations of the upstream JSON payloads.
//!
//! Wire records are converted into `ca-core` domain types as soon as they
//! are parsed. Records the domain cannot represent (unknown rating,
//! unparseable timestamps) are logged and dropped; one bad record never
//! aborts the surrounding request.

use serde::Deserialize;

use ca_core::{Membership, RosterEntry, Session, parse_timestamp};

/// `GET {roster}/facility/{id}/roster/both`
#[derive(Debug, Deserialize)]
pub(crate) struct RosterResponse {
    pub data: Vec<RosterRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RosterRecord {
    pub cid: u32,
    pub fname: String,
    pub lname: String,
    pub email: String,
    pub rating_short: String,
    pub membership: String,
}

impl RosterRecord {
    pub(crate) fn into_entry(self) -> Option<RosterEntry> {
        let rating = match self.rating_short.parse() {
            Ok(rating) => rating,
            Err(err) => {
                tracing::warn!(cid = self.cid, error = %err, "dropping roster record");
                return None;
            }
        };
        Some(RosterEntry {
            cid: self.cid,
            first_name: self.fname,
            last_name: self.lname,
            email: self.email,
            rating,
            membership: Membership::from(self.membership),
        })
    }
}

/// `GET {sessions}/members/{cid}/atc`
#[derive(Debug, Deserialize)]
pub(crate) struct SessionsResponse {
    pub items: Vec<SessionRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SessionRecord {
    pub connection_id: ConnectionRecord,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConnectionRecord {
    pub callsign: String,
    pub start: String,
    pub end: String,
}

impl SessionRecord {
    pub(crate) fn into_session(self, cid: u32) -> Option<Session> {
        let connection = self.connection_id;
        let start = match parse_timestamp(&connection.start) {
            Ok(start) => start,
            Err(err) => {
                tracing::warn!(cid, callsign = %connection.callsign, error = %err, "dropping session");
                return None;
            }
        };
        let end = match parse_timestamp(&connection.end) {
            Ok(end) => end,
            Err(err) => {
                tracing::warn!(cid, callsign = %connection.callsign, error = %err, "dropping session");
                return None;
            }
        };
        Some(Session {
            callsign: connection.callsign,
            start,
            end,
        })
    }
}
