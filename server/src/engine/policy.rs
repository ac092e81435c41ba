//! Pure authorization decisions for the chat core. No side effects and no
//! store access: callers gather the facts (membership, ownership, admin
//! flag, timestamps) and these functions answer yes or no. Every caller
//! checks the answer before acting, never after.

use chrono::{DateTime, Duration, Utc};

use crate::error::ChatError;

/// How long after sending a message its author may still edit or delete it.
pub const EDIT_WINDOW_SECS: i64 = 5 * 60;

/// Which role removed a message. Recorded on the tombstone for client display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletedBy {
    Author,
    ClubOwner,
    Admin,
}

impl DeletedBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeletedBy::Author => "self",
            DeletedBy::ClubOwner => "club-owner",
            DeletedBy::Admin => "admin",
        }
    }
}

/// A message is editable by its author only within the window.
pub fn within_edit_window(created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now.signed_duration_since(created_at) <= Duration::seconds(EDIT_WINDOW_SECS)
}

/// Posting requires current club membership.
pub fn can_post(is_member: bool) -> Result<(), ChatError> {
    if is_member {
        Ok(())
    } else {
        Err(ChatError::permission("you are not a member of this club"))
    }
}

/// Only the author may edit, and only within the edit window.
pub fn can_edit(
    author_id: &str,
    actor_id: &str,
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), ChatError> {
    if actor_id != author_id {
        return Err(ChatError::permission("only the author can edit a message"));
    }
    if !within_edit_window(created_at, now) {
        return Err(ChatError::permission("the edit window has expired"));
    }
    Ok(())
}

/// Deletion: admins and the club creator may delete at any time; the author
/// only within the edit window. Returns the role to record on the tombstone.
pub fn delete_role(
    author_id: &str,
    created_at: DateTime<Utc>,
    club_creator_id: &str,
    actor_id: &str,
    actor_is_admin: bool,
    now: DateTime<Utc>,
) -> Result<DeletedBy, ChatError> {
    if actor_is_admin {
        return Ok(DeletedBy::Admin);
    }
    if actor_id == club_creator_id {
        return Ok(DeletedBy::ClubOwner);
    }
    if actor_id == author_id {
        if within_edit_window(created_at, now) {
            return Ok(DeletedBy::Author);
        }
        return Err(ChatError::permission(
            "the delete window has expired; ask the club owner",
        ));
    }
    Err(ChatError::permission(
        "only the author, the club owner, or an admin can delete a message",
    ))
}

/// Member removal: only an admin or the club creator may remove, and the
/// creator can never be the target — not even for an admin.
pub fn can_remove_member(
    club_creator_id: &str,
    actor_id: &str,
    actor_is_admin: bool,
    target_id: &str,
) -> Result<(), ChatError> {
    if !actor_is_admin && actor_id != club_creator_id {
        return Err(ChatError::permission(
            "only the club owner or an admin can remove members",
        ));
    }
    if target_id == club_creator_id {
        return Err(ChatError::permission("the club creator cannot be removed"));
    }
    Ok(())
}

/// Leaving voluntarily: anyone but the creator, who must delete the club
/// instead.
pub fn can_leave(club_creator_id: &str, user_id: &str) -> Result<(), ChatError> {
    if user_id == club_creator_id {
        return Err(ChatError::permission(
            "the club creator cannot leave; delete the club instead",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs_ago: i64) -> (DateTime<Utc>, DateTime<Utc>) {
        let now = Utc::now();
        (now - Duration::seconds(secs_ago), now)
    }

    #[test]
    fn test_can_post() {
        assert!(can_post(true).is_ok());
        assert!(matches!(can_post(false), Err(ChatError::Permission(_))));
    }

    #[test]
    fn test_edit_window_boundaries() {
        let (created, now) = at(0);
        assert!(within_edit_window(created, now));

        let (created, now) = at(EDIT_WINDOW_SECS - 1);
        assert!(within_edit_window(created, now));

        let (created, now) = at(EDIT_WINDOW_SECS + 1);
        assert!(!within_edit_window(created, now));
    }

    #[test]
    fn test_author_can_edit_within_window() {
        let (created, now) = at(120);
        assert!(can_edit("u1", "u1", created, now).is_ok());
    }

    #[test]
    fn test_edit_fails_after_window_regardless_of_actor() {
        let (created, now) = at(EDIT_WINDOW_SECS + 60);
        assert!(can_edit("u1", "u1", created, now).is_err());
        // Not even the author's own message is editable late.
        assert!(can_edit("u1", "u2", created, now).is_err());
    }

    #[test]
    fn test_only_author_can_edit() {
        let (created, now) = at(10);
        assert!(can_edit("u1", "u2", created, now).is_err());
    }

    #[test]
    fn test_author_delete_within_window_only() {
        let (created, now) = at(60);
        assert_eq!(
            delete_role("u1", created, "owner", "u1", false, now).unwrap(),
            DeletedBy::Author
        );

        let (created, now) = at(EDIT_WINDOW_SECS + 60);
        assert!(delete_role("u1", created, "owner", "u1", false, now).is_err());
    }

    #[test]
    fn test_club_creator_delete_bypasses_window() {
        let (created, now) = at(EDIT_WINDOW_SECS * 10);
        assert_eq!(
            delete_role("u1", created, "owner", "owner", false, now).unwrap(),
            DeletedBy::ClubOwner
        );
    }

    #[test]
    fn test_admin_delete_is_unconditional() {
        let (created, now) = at(EDIT_WINDOW_SECS * 100);
        // Admin is neither the author nor the club creator.
        assert_eq!(
            delete_role("u1", created, "owner", "moderator", true, now).unwrap(),
            DeletedBy::Admin
        );
    }

    #[test]
    fn test_random_member_cannot_delete() {
        let (created, now) = at(10);
        assert!(delete_role("u1", created, "owner", "u2", false, now).is_err());
    }

    #[test]
    fn test_remove_member_requires_owner_or_admin() {
        assert!(can_remove_member("owner", "owner", false, "u2").is_ok());
        assert!(can_remove_member("owner", "admin", true, "u2").is_ok());
        assert!(can_remove_member("owner", "u3", false, "u2").is_err());
    }

    #[test]
    fn test_creator_can_never_be_removed() {
        // Not by themselves, not by an admin.
        assert!(can_remove_member("owner", "owner", false, "owner").is_err());
        assert!(can_remove_member("owner", "admin", true, "owner").is_err());
    }

    #[test]
    fn test_creator_cannot_leave() {
        assert!(can_leave("owner", "owner").is_err());
        assert!(can_leave("owner", "u2").is_ok());
    }

    #[test]
    fn test_deleted_by_labels() {
        assert_eq!(DeletedBy::Author.as_str(), "self");
        assert_eq!(DeletedBy::ClubOwner.as_str(), "club-owner");
        assert_eq!(DeletedBy::Admin.as_str(), "admin");
    }
}
