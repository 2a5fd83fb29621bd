//! Round-robin turn driver for the agent exchange.

use crate::agents::Participant;
use crate::error::Result;
use crate::transcript::{Message, MessageKind};
use tracing::debug;

/// Drives a bounded, strictly sequential round-robin exchange.
///
/// Each turn's input is the prior turn's output, so turns are never
/// concurrent. The transcript starts with the seeded message and is returned
/// whole once the turn budget is spent or a participant emits the stop token.
pub struct Team {
    participants: Vec<Box<dyn Participant>>,
    max_turns: usize,
    stop_token: Option<String>,
}

impl Team {
    /// Create a team with the given participants and turn budget.
    ///
    /// Panics if `participants` is empty: the round-robin has no meaning
    /// without at least one participant.
    pub fn new(participants: Vec<Box<dyn Participant>>, max_turns: usize) -> Self {
        assert!(
            !participants.is_empty(),
            "Team requires at least one participant"
        );
        Self {
            participants,
            max_turns,
            stop_token: None,
        }
    }

    /// Stop the exchange early once a text message contains this token.
    pub fn with_stop_token(mut self, token: &str) -> Self {
        self.stop_token = Some(token.to_string());
        self
    }

    /// Run the exchange seeded with the given message.
    ///
    /// Returns the full transcript, never a partial one: every appended
    /// message stays in the result even when the stop token ends the run.
    pub async fn run(&self, seed: Message) -> Result<Vec<Message>> {
        let mut transcript = vec![seed];

        'turns: for turn in 0..self.max_turns {
            let participant = &self.participants[turn % self.participants.len()];
            debug!("Turn {} -> {}", turn + 1, participant.source());

            let contribution = participant.take_turn(&transcript).await?;

            for msg in contribution {
                let stop = self.is_stop(&msg);
                transcript.push(msg);
                if stop {
                    debug!("Stop token observed, ending exchange");
                    break 'turns;
                }
            }
        }

        Ok(transcript)
    }

    fn is_stop(&self, msg: &Message) -> bool {
        match &self.stop_token {
            Some(token) => msg.kind == MessageKind::Text && msg.content.contains(token),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::Source;
    use async_trait::async_trait;

    /// Scripted participant that replays canned responses.
    struct Scripted {
        source: Source,
        responses: Vec<Vec<Message>>,
        calls: std::sync::Mutex<usize>,
    }

    impl Scripted {
        fn new(source: Source, responses: Vec<Vec<Message>>) -> Self {
            Self {
                source,
                responses,
                calls: std::sync::Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl Participant for Scripted {
        fn source(&self) -> Source {
            self.source
        }

        async fn take_turn(&self, _transcript: &[Message]) -> Result<Vec<Message>> {
            let mut calls = self.calls.lock().unwrap();
            let response = self.responses[*calls % self.responses.len()].clone();
            *calls += 1;
            Ok(response)
        }
    }

    fn seed() -> Message {
        Message::seed("identify this", "data:image/png;base64,AAAA")
    }

    #[tokio::test]
    async fn test_round_robin_order_and_turn_budget() {
        let writer = Scripted::new(
            Source::RecipeWriter,
            vec![vec![Message::text(Source::RecipeWriter, "DISH: Ramen")]],
        );
        let finder = Scripted::new(
            Source::VideoFinder,
            vec![vec![Message::text(Source::VideoFinder, "no table yet")]],
        );

        let team = Team::new(vec![Box::new(writer), Box::new(finder)], 4);
        let transcript = team.run(seed()).await.unwrap();

        // seed + 4 turns, alternating writer/finder
        assert_eq!(transcript.len(), 5);
        assert_eq!(transcript[1].source, Source::RecipeWriter);
        assert_eq!(transcript[2].source, Source::VideoFinder);
        assert_eq!(transcript[3].source, Source::RecipeWriter);
        assert_eq!(transcript[4].source, Source::VideoFinder);
    }

    #[test]
    #[should_panic(expected = "at least one participant")]
    fn test_empty_team_rejected() {
        Team::new(Vec::new(), 4);
    }

    #[tokio::test]
    async fn test_stop_token_ends_exchange_early() {
        let writer = Scripted::new(
            Source::RecipeWriter,
            vec![vec![Message::text(Source::RecipeWriter, "DISH: Ramen")]],
        );
        let finder = Scripted::new(
            Source::VideoFinder,
            vec![vec![
                Message::tool_call(Source::VideoFinder, "{}"),
                Message::tool_result(Source::VideoFinder, "[]"),
                Message::text(Source::VideoFinder, "| Title | ... |\nDONE"),
            ]],
        );

        let team = Team::new(vec![Box::new(writer), Box::new(finder)], 4).with_stop_token("DONE");
        let transcript = team.run(seed()).await.unwrap();

        // seed + writer text + finder's three entries; turns 3 and 4 never run
        assert_eq!(transcript.len(), 5);
        assert!(transcript.last().unwrap().content.contains("DONE"));
    }

    #[tokio::test]
    async fn test_stop_token_ignored_on_tool_events() {
        let writer = Scripted::new(
            Source::RecipeWriter,
            vec![vec![Message::text(Source::RecipeWriter, "DISH: Ramen")]],
        );
        let finder = Scripted::new(
            Source::VideoFinder,
            vec![vec![
                // A payload that happens to contain the token is not a stop.
                Message::tool_result(Source::VideoFinder, r#"[{"title": "DONE deal"}]"#),
                Message::text(Source::VideoFinder, "still searching"),
            ]],
        );

        let team = Team::new(vec![Box::new(writer), Box::new(finder)], 4).with_stop_token("DONE");
        let transcript = team.run(seed()).await.unwrap();

        // No early stop: all four turns execute.
        assert_eq!(transcript[1].source, Source::RecipeWriter);
        assert_eq!(transcript.last().unwrap().content, "still searching");
        assert_eq!(
            transcript
                .iter()
                .filter(|m| m.source == Source::RecipeWriter)
                .count(),
            2
        );
    }
}
