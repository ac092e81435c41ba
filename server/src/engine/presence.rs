//! In-memory per-club presence tracking with multi-connection support.
//!
//! Presence is keyed per (club, user) with an open-connection count: a user
//! with two tabs on the same club stays online until both disconnect. A plain
//! set keyed by user id would evict them on the first disconnect.
//!
//! Presence is purely a function of live connections — it does not imply
//! club membership, which is checked separately before any message is posted.

use std::collections::HashMap;

use dashmap::DashMap;

/// Thread-safe, DashMap-backed presence registry: club id -> user id -> count.
pub struct PresenceRegistry {
    clubs: DashMap<String, HashMap<String, usize>>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self {
            clubs: DashMap::new(),
        }
    }

    /// Register one connection of `user_id` to `club_id`'s room.
    /// Returns the updated online-user list for the club.
    pub fn join(&self, club_id: &str, user_id: &str) -> Vec<String> {
        let mut entry = self.clubs.entry(club_id.to_string()).or_default();
        *entry.entry(user_id.to_string()).or_insert(0) += 1;
        let mut users: Vec<String> = entry.keys().cloned().collect();
        users.sort();
        users
    }

    /// Drop one connection of `user_id` from `club_id`'s room. The user
    /// leaves the online set only when their last connection goes; the club
    /// entry itself is dropped once nobody is left.
    /// Returns the updated online-user list for the club.
    pub fn leave(&self, club_id: &str, user_id: &str) -> Vec<String> {
        let users = {
            let Some(mut entry) = self.clubs.get_mut(club_id) else {
                return Vec::new();
            };
            if let Some(count) = entry.get_mut(user_id) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    entry.remove(user_id);
                }
            }
            let mut users: Vec<String> = entry.keys().cloned().collect();
            users.sort();
            users
        };

        if users.is_empty() {
            self.clubs.remove_if(club_id, |_, counts| counts.is_empty());
        }
        users
    }

    /// Current online-user list for a club.
    pub fn online_users(&self, club_id: &str) -> Vec<String> {
        let mut users: Vec<String> = self
            .clubs
            .get(club_id)
            .map(|entry| entry.keys().cloned().collect())
            .unwrap_or_default();
        users.sort();
        users
    }

    pub fn is_online(&self, club_id: &str, user_id: &str) -> bool {
        self.clubs
            .get(club_id)
            .map(|entry| entry.contains_key(user_id))
            .unwrap_or(false)
    }
}

impl Default for PresenceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
