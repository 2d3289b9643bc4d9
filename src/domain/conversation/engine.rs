//! Step transition engine.
//!
//! One canonical transition table over [`Step`], replacing the long
//! conditional chains this flow tends to accumulate. Each step consumes
//! exactly one message and yields a structured transition: reply text,
//! next step, data delta, and optionally a redirect or a side-effect
//! request for the application layer.

use crate::domain::identity::EmailAddress;
use crate::domain::session::{DataBag, DataKey, Step};
use crate::domain::verification::{looks_like_code, CodeCheck, CODE_LENGTH};

use super::Redirect;

/// Minimum accepted length for a name.
const MIN_NAME_LENGTH: usize = 2;

/// Keywords that start preference collection from the verified step.
const FIND_KEYWORDS: [&str; 5] = ["university", "course", "find", "study", "program"];

/// Keywords that restart collection from the absorbing state.
const RESTART_KEYWORDS: [&str; 5] = ["search", "again", "new", "different", "change"];

/// A fully computed transition: what to say, where to go, what to store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOutput {
    pub reply: String,
    pub next_step: Step,
    pub delta: Vec<(DataKey, String)>,
    pub redirect: Option<Redirect>,
}

impl EngineOutput {
    fn stay(step: Step, reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            next_step: step,
            delta: Vec::new(),
            redirect: None,
        }
    }

    fn advance(step: Step, reply: impl Into<String>) -> Self {
        Self::stay(step, reply)
    }

    fn with_delta(mut self, key: DataKey, value: impl Into<String>) -> Self {
        self.delta.push((key, value.into()));
        self
    }

    fn with_redirect(mut self, redirect: Redirect) -> Self {
        self.redirect = Some(redirect);
        self
    }
}

/// Result of advancing the conversation by one message.
///
/// Most steps complete in one shot. The email and otp steps delegate their
/// side effects: the caller issues/dispatches the code for
/// `StartVerification`, and consults the store then calls
/// [`ConversationEngine::resolve_code`] for `SubmitCode`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Transition computed entirely from step, bag, and message.
    Complete(EngineOutput),
    /// Email accepted: resolve/create the identity, issue a code, send it,
    /// then apply `output`.
    StartVerification {
        email: EmailAddress,
        output: EngineOutput,
    },
    /// A well-formed code was submitted: check it against the store and
    /// resolve the outcome.
    SubmitCode { code: String },
}

/// The step-transition table.
///
/// Pure apart from the explicitly delegated side effects, so transition
/// logic tests need no store, network, or mail dependencies.
#[derive(Debug, Clone)]
pub struct ConversationEngine {
    courses_path: String,
}

impl ConversationEngine {
    /// Creates an engine that builds redirects under the given base path.
    pub fn new(courses_path: impl Into<String>) -> Self {
        Self {
            courses_path: courses_path.into(),
        }
    }

    /// Advances the conversation by one user message.
    pub fn advance(&self, step: Step, data: &DataBag, raw_message: &str) -> Transition {
        let message = raw_message.trim();
        let message_lower = message.to_lowercase();

        match step {
            Step::Greeting => Transition::Complete(EngineOutput::advance(
                Step::Name,
                "Hello! Welcome to StudyGlobal. To get started, could you please tell me your name?",
            )),

            Step::Name => {
                if message.chars().count() < MIN_NAME_LENGTH {
                    return Transition::Complete(EngineOutput::stay(
                        Step::Name,
                        "Please enter a valid name (at least 2 characters).",
                    ));
                }
                let name = title_case(message);
                Transition::Complete(
                    EngineOutput::advance(
                        Step::Email,
                        format!(
                            "Nice to meet you, {}! Now, could you please provide your email \
                             address so we can verify your account?",
                            name
                        ),
                    )
                    .with_delta(DataKey::Name, name),
                )
            }

            Step::Email => match EmailAddress::parse(message) {
                Err(_) => Transition::Complete(EngineOutput::stay(
                    Step::Email,
                    "That doesn't look like a valid email address. Please provide a valid email.",
                )),
                Ok(email) => {
                    let output = EngineOutput::advance(
                        Step::Otp,
                        format!(
                            "Great! We've sent a 6-digit verification code to {}. \
                             Please enter it here to continue.",
                            email
                        ),
                    );
                    Transition::StartVerification { email, output }
                }
            },

            Step::Otp => {
                if !looks_like_code(message) {
                    return Transition::Complete(EngineOutput::stay(
                        Step::Otp,
                        format!("Please enter a valid {}-digit code.", CODE_LENGTH),
                    ));
                }
                Transition::SubmitCode {
                    code: message.to_string(),
                }
            }

            Step::Verified => {
                if contains_any(&message_lower, &FIND_KEYWORDS) {
                    Transition::Complete(EngineOutput::advance(
                        Step::CollectCountry,
                        "Great! I can help you to find that. First, which country would you \
                         like to study in?",
                    ))
                } else {
                    Transition::Complete(EngineOutput::stay(
                        Step::Verified,
                        "I can help you find universities and courses. Just tell me you'd \
                         like to find a course, and I'll guide you through the process.",
                    ))
                }
            }

            Step::CollectCountry => {
                let country = title_case(message);
                Transition::Complete(
                    EngineOutput::advance(
                        Step::CollectDuration,
                        format!(
                            "Perfect! {} is a great choice. What duration are you looking \
                             for? (e.g., 1 year, 2 years, etc.)",
                            country
                        ),
                    )
                    .with_delta(DataKey::Country, country),
                )
            }

            Step::CollectDuration => Transition::Complete(
                EngineOutput::advance(
                    Step::CollectLevel,
                    "Got it! What program level are you interested in? \
                     (e.g., Bachelor's, Master's, PhD, Diploma, etc.)",
                )
                .with_delta(DataKey::Duration, message_lower),
            ),

            Step::CollectLevel => {
                let level = title_case(message);
                Transition::Complete(
                    EngineOutput::advance(
                        Step::CollectCourse,
                        format!(
                            "Excellent! {} level it is. Now, what specific course or field \
                             of study are you interested in? (e.g., Computer Science, \
                             Business, Engineering, etc.)",
                            level
                        ),
                    )
                    .with_delta(DataKey::Level, level),
                )
            }

            Step::CollectCourse => {
                let course = title_case(message);
                let country = data.get(DataKey::Country).unwrap_or_default();
                let duration = data.get(DataKey::Duration).unwrap_or_default();
                let level = data.get(DataKey::Level).unwrap_or_default();

                let redirect =
                    Redirect::course_search(&self.courses_path, country, duration, level, &course);
                let reply = format!(
                    "Perfect! I've found courses matching your preferences:\n\
                     • Country: {}\n\
                     • Duration: {}\n\
                     • Level: {}\n\
                     • Course: {}\n\n\
                     Click the button below to see your personalized course recommendations!",
                    country, duration, level, course
                );

                Transition::Complete(
                    EngineOutput::advance(Step::PreferencesCollected, reply)
                        .with_delta(DataKey::Course, course)
                        .with_redirect(redirect),
                )
            }

            Step::PreferencesCollected => {
                if contains_any(&message_lower, &RESTART_KEYWORDS) {
                    Transition::Complete(EngineOutput::advance(
                        Step::CollectCountry,
                        "Let's find more courses for you! Which country would you like to \
                         study in this time?",
                    ))
                } else if contains_any(&message_lower, &FIND_KEYWORDS) {
                    Transition::Complete(EngineOutput::advance(
                        Step::CollectCountry,
                        "Great! I can help you find another course. Which country would you \
                         like to study in?",
                    ))
                } else {
                    Transition::Complete(EngineOutput::stay(
                        Step::PreferencesCollected,
                        "I can help you find more courses. Just say 'search again' to start \
                         a new search, or tell me you'd like to find courses.",
                    ))
                }
            }
        }
    }

    /// Resolves a code check performed by the caller into the otp-step
    /// transition, keeping all reply text in one table.
    pub fn resolve_code(&self, check: CodeCheck) -> EngineOutput {
        match check {
            CodeCheck::Valid => EngineOutput::advance(
                Step::Verified,
                "Perfect! Your account has been verified. How can I help you with your \
                 study abroad journey today?",
            ),
            CodeCheck::Expired => EngineOutput::stay(
                Step::Otp,
                "This code has expired. Please request a new one.",
            ),
            CodeCheck::NotFound => EngineOutput::stay(
                Step::Otp,
                "Invalid verification code. Please try again.",
            ),
        }
    }
}

/// Case-insensitive substring match against a keyword set.
fn contains_any(message_lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| message_lower.contains(k))
}

/// Capitalizes the first letter of each whitespace-separated word and
/// lower-cases the rest.
fn title_case(input: &str) -> String {
    input
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> ConversationEngine {
        ConversationEngine::new("/courses")
    }

    fn complete(transition: Transition) -> EngineOutput {
        match transition {
            Transition::Complete(output) => output,
            other => panic!("expected complete transition, got {:?}", other),
        }
    }

    mod title_casing {
        use super::*;

        #[test]
        fn capitalizes_each_word() {
            assert_eq!(title_case("computer science"), "Computer Science");
        }

        #[test]
        fn lowercases_the_rest() {
            assert_eq!(title_case("FRANCE"), "France");
        }

        #[test]
        fn keeps_apostrophes_intact() {
            assert_eq!(title_case("master's"), "Master's");
        }

        #[test]
        fn collapses_surrounding_whitespace() {
            assert_eq!(title_case("  al  "), "Al");
        }

        #[test]
        fn two_character_name() {
            assert_eq!(title_case("al"), "Al");
        }
    }

    mod greeting {
        use super::*;

        #[test]
        fn any_message_moves_to_name() {
            let out = complete(engine().advance(Step::Greeting, &DataBag::new(), "hi"));
            assert_eq!(out.next_step, Step::Name);
            assert!(out.reply.contains("Welcome to StudyGlobal"));
            assert!(out.delta.is_empty());
        }

        #[test]
        fn empty_message_also_moves_to_name() {
            let out = complete(engine().advance(Step::Greeting, &DataBag::new(), ""));
            assert_eq!(out.next_step, Step::Name);
        }
    }

    mod name {
        use super::*;

        #[test]
        fn rejects_single_character() {
            let out = complete(engine().advance(Step::Name, &DataBag::new(), "a"));
            assert_eq!(out.next_step, Step::Name);
            assert!(out.reply.contains("at least 2 characters"));
            assert!(out.delta.is_empty());
        }

        #[test]
        fn accepts_two_characters_and_title_cases() {
            let out = complete(engine().advance(Step::Name, &DataBag::new(), "al"));
            assert_eq!(out.next_step, Step::Email);
            assert_eq!(out.delta, vec![(DataKey::Name, "Al".to_string())]);
            assert!(out.reply.contains("Nice to meet you, Al!"));
        }

        #[test]
        fn trims_before_length_check() {
            let out = complete(engine().advance(Step::Name, &DataBag::new(), "  a  "));
            assert_eq!(out.next_step, Step::Name);
        }

        #[test]
        fn resubmitting_valid_name_yields_same_transition() {
            let out1 = complete(engine().advance(Step::Name, &DataBag::new(), "Jo"));
            let out2 = complete(engine().advance(Step::Name, &DataBag::new(), "Jo"));
            assert_eq!(out1, out2);
        }
    }

    mod email {
        use super::*;

        #[test]
        fn rejects_address_without_at() {
            let out = complete(engine().advance(Step::Email, &DataBag::new(), "foobar.com"));
            assert_eq!(out.next_step, Step::Email);
            assert!(out.reply.contains("valid email"));
        }

        #[test]
        fn rejects_address_without_dot_in_domain() {
            let out = complete(engine().advance(Step::Email, &DataBag::new(), "foo@barcom"));
            assert_eq!(out.next_step, Step::Email);
        }

        #[test]
        fn accepts_and_normalizes_address() {
            match engine().advance(Step::Email, &DataBag::new(), "Foo@Bar.com") {
                Transition::StartVerification { email, output } => {
                    assert_eq!(email.as_str(), "foo@bar.com");
                    assert_eq!(output.next_step, Step::Otp);
                    assert!(output.reply.contains("foo@bar.com"));
                    assert!(output.reply.contains("6-digit"));
                }
                other => panic!("expected verification start, got {:?}", other),
            }
        }
    }

    mod otp {
        use super::*;

        #[test]
        fn rejects_short_code() {
            let out = complete(engine().advance(Step::Otp, &DataBag::new(), "12345"));
            assert_eq!(out.next_step, Step::Otp);
            assert!(out.reply.contains("6-digit"));
        }

        #[test]
        fn rejects_non_numeric_code() {
            let out = complete(engine().advance(Step::Otp, &DataBag::new(), "12345a"));
            assert_eq!(out.next_step, Step::Otp);
        }

        #[test]
        fn well_formed_code_defers_to_store() {
            match engine().advance(Step::Otp, &DataBag::new(), " 042137 ") {
                Transition::SubmitCode { code } => assert_eq!(code, "042137"),
                other => panic!("expected code submission, got {:?}", other),
            }
        }

        #[test]
        fn valid_check_moves_to_verified() {
            let out = engine().resolve_code(CodeCheck::Valid);
            assert_eq!(out.next_step, Step::Verified);
            assert!(out.reply.contains("verified"));
        }

        #[test]
        fn expired_check_stays_and_suggests_resend() {
            let out = engine().resolve_code(CodeCheck::Expired);
            assert_eq!(out.next_step, Step::Otp);
            assert!(out.reply.contains("expired"));
        }

        #[test]
        fn not_found_check_stays_with_invalid_reply() {
            let out = engine().resolve_code(CodeCheck::NotFound);
            assert_eq!(out.next_step, Step::Otp);
            assert!(out.reply.contains("Invalid verification code"));
        }
    }

    mod verified {
        use super::*;

        #[test]
        fn find_keyword_starts_collection() {
            let out = complete(engine().advance(
                Step::Verified,
                &DataBag::new(),
                "I want to find a course",
            ));
            assert_eq!(out.next_step, Step::CollectCountry);
            assert!(out.reply.contains("which country"));
        }

        #[test]
        fn keyword_match_is_case_insensitive() {
            let out = complete(engine().advance(Step::Verified, &DataBag::new(), "STUDY abroad"));
            assert_eq!(out.next_step, Step::CollectCountry);
        }

        #[test]
        fn unrelated_message_gets_generic_help() {
            let out = complete(engine().advance(Step::Verified, &DataBag::new(), "hello there"));
            assert_eq!(out.next_step, Step::Verified);
            assert!(out.reply.contains("universities and courses"));
        }
    }

    mod collection {
        use super::*;

        #[test]
        fn country_is_title_cased_and_stored() {
            let out = complete(engine().advance(Step::CollectCountry, &DataBag::new(), "france"));
            assert_eq!(out.next_step, Step::CollectDuration);
            assert_eq!(out.delta, vec![(DataKey::Country, "France".to_string())]);
            assert!(out.reply.contains("France is a great choice"));
        }

        #[test]
        fn duration_is_lower_cased_and_stored() {
            let out = complete(engine().advance(Step::CollectDuration, &DataBag::new(), "2 Years"));
            assert_eq!(out.next_step, Step::CollectLevel);
            assert_eq!(out.delta, vec![(DataKey::Duration, "2 years".to_string())]);
        }

        #[test]
        fn level_is_title_cased_and_stored() {
            let out = complete(engine().advance(Step::CollectLevel, &DataBag::new(), "master's"));
            assert_eq!(out.next_step, Step::CollectCourse);
            assert_eq!(out.delta, vec![(DataKey::Level, "Master's".to_string())]);
        }

        #[test]
        fn course_completes_collection_with_redirect() {
            let mut bag = DataBag::new();
            bag.set(DataKey::Country, "France");
            bag.set(DataKey::Duration, "2 years");
            bag.set(DataKey::Level, "Master's");

            let out = complete(engine().advance(Step::CollectCourse, &bag, "computer science"));
            assert_eq!(out.next_step, Step::PreferencesCollected);
            assert_eq!(out.delta, vec![(DataKey::Course, "Computer Science".to_string())]);

            let redirect = out.redirect.expect("redirect descriptor");
            assert_eq!(
                redirect.url,
                "/courses?country=France&duration=2%20years&level=Master%27s&course=Computer%20Science"
            );
            assert_eq!(redirect.button_text, "View Recommended Courses");
            assert!(out.reply.contains("• Country: France"));
            assert!(out.reply.contains("• Course: Computer Science"));
        }

        #[test]
        fn only_final_step_produces_redirect() {
            let out = complete(engine().advance(Step::CollectCountry, &DataBag::new(), "France"));
            assert!(out.redirect.is_none());
        }
    }

    mod preferences_collected {
        use super::*;

        #[test]
        fn search_again_loops_back_to_country() {
            let out = complete(engine().advance(
                Step::PreferencesCollected,
                &DataBag::new(),
                "search again",
            ));
            assert_eq!(out.next_step, Step::CollectCountry);
            assert!(out.reply.contains("more courses"));
        }

        #[test]
        fn find_keyword_also_loops_back() {
            let out = complete(engine().advance(
                Step::PreferencesCollected,
                &DataBag::new(),
                "find another program",
            ));
            assert_eq!(out.next_step, Step::CollectCountry);
        }

        #[test]
        fn loop_back_keeps_bag_untouched() {
            let mut bag = DataBag::new();
            bag.set(DataKey::Country, "France");
            let out = complete(engine().advance(Step::PreferencesCollected, &bag, "search again"));
            // Retain-and-overwrite: the engine emits no delta; revisiting
            // collect_country overwrites the key later.
            assert!(out.delta.is_empty());
        }

        #[test]
        fn unrelated_message_stays_absorbed() {
            let out = complete(engine().advance(
                Step::PreferencesCollected,
                &DataBag::new(),
                "thanks!",
            ));
            assert_eq!(out.next_step, Step::PreferencesCollected);
            assert!(out.reply.contains("search again"));
        }
    }

    mod full_flow {
        use super::*;
        use crate::domain::session::ChatSession;

        /// Drives the pure engine through the whole post-verification flow,
        /// applying deltas the way the application layer does.
        #[test]
        fn collection_walk_populates_bag_and_redirect() {
            let engine = engine();
            let mut session = ChatSession::new();
            session.apply(Step::Verified, vec![(DataKey::Name, "Jo".to_string())]);

            for (message, expected) in [
                ("I want to find a course", Step::CollectCountry),
                ("France", Step::CollectDuration),
                ("2 years", Step::CollectLevel),
                ("Master's", Step::CollectCourse),
            ] {
                let out = complete(engine.advance(session.step(), session.data(), message));
                assert_eq!(out.next_step, expected);
                session.apply(out.next_step, out.delta);
            }

            let out = complete(engine.advance(session.step(), session.data(), "Computer Science"));
            assert_eq!(out.next_step, Step::PreferencesCollected);
            session.apply(out.next_step, out.delta);

            assert_eq!(session.data().get(DataKey::Country), Some("France"));
            assert_eq!(session.data().get(DataKey::Duration), Some("2 years"));
            assert_eq!(session.data().get(DataKey::Level), Some("Master's"));
            assert_eq!(session.data().get(DataKey::Course), Some("Computer Science"));
            assert!(out.redirect.is_some());

            // Loop back and overwrite country on the second pass
            let out = complete(engine.advance(session.step(), session.data(), "search again"));
            session.apply(out.next_step, out.delta);
            assert_eq!(session.step(), Step::CollectCountry);
            assert_eq!(session.data().get(DataKey::Country), Some("France"));

            let out = complete(engine.advance(session.step(), session.data(), "Germany"));
            session.apply(out.next_step, out.delta);
            assert_eq!(session.data().get(DataKey::Country), Some("Germany"));
        }
    }
}
