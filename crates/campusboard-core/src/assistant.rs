//! Rule-based keyword assistant.
//!
//! Maps a free-text message to a canned answer. Keyword groups are checked in
//! a fixed order and the first group with a keyword occurring anywhere in the
//! lower-cased message wins, so "hi" also matches inside "this".

use serde::Serialize;

/// What a message was recognized as asking about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Empty,
    Admin,
    Upcoming,
    Search,
    Greeting,
    Unknown,
}

struct KeywordGroup {
    intent: Intent,
    keywords: &'static [&'static str],
}

/// Checked top to bottom.
const KEYWORD_GROUPS: &[KeywordGroup] = &[
    KeywordGroup {
        intent: Intent::Admin,
        keywords: &["admin", "login", "credentials"],
    },
    KeywordGroup {
        intent: Intent::Upcoming,
        keywords: &["upcoming", "next 7 days", "filter"],
    },
    KeywordGroup {
        intent: Intent::Search,
        keywords: &["recommendation", "search", "event", "interested"],
    },
    KeywordGroup {
        intent: Intent::Greeting,
        keywords: &["hello", "hi", "hey"],
    },
];

/// Classify a message by the first matching keyword group.
///
/// Only a zero-length message is `Empty`; whitespace falls through to `Unknown`.
pub fn classify(message: &str) -> Intent {
    if message.is_empty() {
        return Intent::Empty;
    }
    let message = message.to_lowercase();
    KEYWORD_GROUPS
        .iter()
        .find(|group| group.keywords.iter().any(|kw| message.contains(*kw)))
        .map_or(Intent::Unknown, |group| group.intent)
}

/// Canned answer for an intent.
pub fn response_for(intent: Intent) -> &'static str {
    match intent {
        Intent::Empty => "I didn't receive your message. Please try again!",
        // Never reveal account details here.
        Intent::Admin => {
            "Event management is available to organizers through the admin sign-in page. \
             Please contact your campus administrator if you need access."
        }
        Intent::Upcoming => {
            "The homepage automatically filters events for the next 7 days in the \
             'Upcoming Events' section."
        }
        Intent::Search => {
            "To get personalized recommendations, please use the search bar at the top! \
             I match your interests against event titles, descriptions and venues."
        }
        Intent::Greeting => {
            "Hello! I'm your College Event Assistant. How can I help you find an event?"
        }
        Intent::Unknown => {
            "I'm an assistant for college events. I can help with event search, \
             admin access, or the 7-day filter."
        }
    }
}

/// Answer a free-text message.
pub fn respond(message: &str) -> &'static str {
    response_for(classify(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_are_checked_in_priority_order() {
        assert_eq!(classify("How do I LOGIN?"), Intent::Admin);
        // "event" and "upcoming" both match; upcoming is checked first
        assert_eq!(classify("any upcoming event?"), Intent::Upcoming);
        assert_eq!(classify("I'm interested in music"), Intent::Search);
        assert_eq!(classify("Hey there"), Intent::Greeting);
        assert_eq!(classify("what is the weather"), Intent::Unknown);
    }

    #[test]
    fn matches_substrings() {
        assert_eq!(classify("this"), Intent::Greeting);
        assert_eq!(classify("Show me EVENTS"), Intent::Search);
    }

    #[test]
    fn empty_message_gets_retry_prompt() {
        assert_eq!(classify(""), Intent::Empty);
        assert_eq!(respond(""), "I didn't receive your message. Please try again!");
    }

    #[test]
    fn whitespace_message_gets_fallback_answer() {
        assert_eq!(classify("   "), Intent::Unknown);
        assert_eq!(respond(" \t"), response_for(Intent::Unknown));
    }

    #[test]
    fn admin_answer_discloses_no_credentials() {
        let answer = respond("what are the admin credentials? username and password please");
        let lower = answer.to_lowercase();
        assert!(!lower.contains("password"));
        assert!(!lower.contains("username"));
        assert!(!answer.contains('\''));
    }

    #[test]
    fn every_intent_has_distinct_answer() {
        let intents = [
            Intent::Empty,
            Intent::Admin,
            Intent::Upcoming,
            Intent::Search,
            Intent::Greeting,
            Intent::Unknown,
        ];
        let answers: std::collections::HashSet<_> =
            intents.iter().map(|&i| response_for(i)).collect();
        assert_eq!(answers.len(), intents.len());
    }
}
