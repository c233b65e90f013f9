//! Coarse role classification of jobs, used for display color only.

use serde::Serialize;

const TANK_JOBS: &[&str] = &["Pld", "War", "Drk", "Gnb", "Gla", "Mrd"];
const HEALER_JOBS: &[&str] = &["Whm", "Sch", "Ast", "Sge", "Cnj"];

/// A combatant's party role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Tank,
    Healer,
    Dps,
}

impl Role {
    /// Classify a job abbreviation as reported by the feed (`"Whm"`, `"Drk"`).
    ///
    /// Healers are checked before tanks; anything unrecognized is DPS.
    pub fn classify(job: &str) -> Self {
        let job = job.trim();
        if HEALER_JOBS.iter().any(|j| j.eq_ignore_ascii_case(job)) {
            Role::Healer
        } else if TANK_JOBS.iter().any(|j| j.eq_ignore_ascii_case(job)) {
            Role::Tank
        } else {
            Role::Dps
        }
    }
}
