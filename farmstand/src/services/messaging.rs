//! Direct messages between consumers, producers and admins.

use chrono::{DateTime, Utc};

use crate::models::{Message, MessageId, User, UserId, UserRole};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessagingError {
    #[error("Message content is empty")]
    EmptyContent,

    #[error("User {0} cannot message themselves")]
    SelfMessage(UserId),
}

/// Who `current` can open a conversation with.
///
/// Admins see everyone, consumers see every producer, and producers see the
/// people who already exchanged messages with them.
pub fn contacts<'a>(current: &User, users: &'a [User], messages: &[Message]) -> Vec<&'a User> {
    users
        .iter()
        .filter(|u| u.id != current.id)
        .filter(|u| match current.role {
            UserRole::Admin => true,
            UserRole::Consumer => u.role == UserRole::Producer,
            UserRole::Producer => messages.iter().any(|m| m.is_between(&current.id, &u.id)),
        })
        .collect()
}

/// Messages between `a` and `b`, oldest first.
pub fn conversation<'a>(messages: &'a [Message], a: &UserId, b: &UserId) -> Vec<&'a Message> {
    let mut thread: Vec<&Message> = messages.iter().filter(|m| m.is_between(a, b)).collect();
    thread.sort_by_key(|m| m.timestamp);
    thread
}

/// Build a new message. Content is kept as typed; only all-blank content is
/// rejected.
pub fn compose(
    sender: &UserId,
    receiver: &UserId,
    content: &str,
    now: DateTime<Utc>,
) -> Result<Message, MessagingError> {
    if content.trim().is_empty() {
        return Err(MessagingError::EmptyContent);
    }
    if sender == receiver {
        return Err(MessagingError::SelfMessage(sender.clone()));
    }

    Ok(Message {
        id: MessageId::generate(),
        sender_id: sender.clone(),
        receiver_id: receiver.clone(),
        content: content.to_string(),
        timestamp: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserStatus;
    use chrono::Duration;

    fn user(id: &str, role: UserRole) -> User {
        User {
            id: UserId::from(id),
            name: id.to_string(),
            email: format!("{id}@example.com"),
            role,
            location: None,
            avatar_url: None,
            bio: None,
            status: UserStatus::Approved,
            is_verified: true,
        }
    }

    fn message(id: &str, from: &str, to: &str, at: DateTime<Utc>) -> Message {
        Message {
            id: MessageId::from(id),
            sender_id: UserId::from(from),
            receiver_id: UserId::from(to),
            content: format!("message {id}"),
            timestamp: at,
        }
    }

    fn users() -> Vec<User> {
        vec![
            user("u1", UserRole::Producer),
            user("u2", UserRole::Consumer),
            user("u3", UserRole::Producer),
            user("u4", UserRole::Admin),
            user("u5", UserRole::Consumer),
        ]
    }

    fn names(users: &[&User]) -> Vec<String> {
        users.iter().map(|u| u.id.to_string()).collect()
    }

    #[test]
    fn test_consumer_sees_all_producers() {
        let users = users();
        let found = contacts(&users[1], &users, &[]);
        assert_eq!(names(&found), vec!["u1", "u3"]);
    }

    #[test]
    fn test_producer_sees_correspondents_only() {
        let users = users();
        let now = Utc::now();
        let messages = vec![message("m1", "u2", "u1", now), message("m2", "u5", "u3", now)];
        let found = contacts(&users[0], &users, &messages);
        assert_eq!(names(&found), vec!["u2"]);
    }

    #[test]
    fn test_admin_sees_everyone_else() {
        let users = users();
        let found = contacts(&users[3], &users, &[]);
        assert_eq!(names(&found), vec!["u1", "u2", "u3", "u5"]);
    }

    #[test]
    fn test_conversation_is_ordered_and_scoped() {
        let now = Utc::now();
        let messages = vec![
            message("m3", "u1", "u2", now),
            message("m1", "u2", "u1", now - Duration::seconds(100)),
            message("m9", "u2", "u3", now - Duration::seconds(50)),
            message("m2", "u1", "u2", now - Duration::seconds(50)),
        ];
        let thread = conversation(&messages, &UserId::from("u1"), &UserId::from("u2"));
        let ids: Vec<&str> = thread.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m2", "m3"]);
    }

    #[test]
    fn test_compose_rejects_blank_content() {
        let err = compose(&UserId::from("u2"), &UserId::from("u1"), "   ", Utc::now()).unwrap_err();
        assert_eq!(err, MessagingError::EmptyContent);
    }

    #[test]
    fn test_compose_rejects_self_message() {
        let err = compose(&UserId::from("u2"), &UserId::from("u2"), "hi", Utc::now()).unwrap_err();
        assert_eq!(err, MessagingError::SelfMessage(UserId::from("u2")));
    }
}
