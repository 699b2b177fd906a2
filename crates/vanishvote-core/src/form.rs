use crate::error::FormError;
use vanishvote_client::PollApi;
use vanishvote_models::{CreatePollRequest, ExpiresIn, Poll, MAX_OPTIONS, MIN_OPTIONS};

/// Draft state of the "create poll" form.
///
/// Option drafts start as two blanks and stay within `[MIN_OPTIONS, MAX_OPTIONS]`.
/// Failed validation or submission never clears the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollForm {
    pub question: String,
    options: Vec<String>,
    pub expires_in: ExpiresIn,
    pub hide_results: bool,
    pub is_private: bool,
}

impl Default for PollForm {
    fn default() -> Self {
        Self {
            question: String::new(),
            options: vec![String::new(); MIN_OPTIONS],
            expires_in: ExpiresIn::default(),
            hide_results: false,
            is_private: true,
        }
    }
}

impl PollForm {
    /// Fill a form from a question and option texts, growing the option list as needed.
    pub fn with_options<I, S>(question: impl Into<String>, options: I) -> Result<Self, FormError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut form = Self {
            question: question.into(),
            ..Self::default()
        };
        for (index, text) in options.into_iter().enumerate() {
            if index >= form.options.len() && !form.add_option() {
                return Err(FormError::TooManyOptions);
            }
            form.set_option(index, text);
        }
        Ok(form)
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn can_add_option(&self) -> bool {
        self.options.len() < MAX_OPTIONS
    }

    pub fn can_remove_option(&self) -> bool {
        self.options.len() > MIN_OPTIONS
    }

    /// Append a blank option. Refused once the form holds `MAX_OPTIONS`.
    pub fn add_option(&mut self) -> bool {
        if !self.can_add_option() {
            return false;
        }
        self.options.push(String::new());
        true
    }

    /// Remove the option at `index`. Refused at `MIN_OPTIONS` or for a bad index.
    pub fn remove_option(&mut self, index: usize) -> bool {
        if !self.can_remove_option() || index >= self.options.len() {
            return false;
        }
        self.options.remove(index);
        true
    }

    pub fn set_option(&mut self, index: usize, text: impl Into<String>) -> bool {
        match self.options.get_mut(index) {
            Some(slot) => {
                *slot = text.into();
                true
            }
            None => false,
        }
    }

    pub fn toggle_hide_results(&mut self) {
        self.hide_results = !self.hide_results;
    }

    pub fn toggle_private(&mut self) {
        self.is_private = !self.is_private;
    }

    /// Check the draft and build the request.
    ///
    /// Whitespace only decides what counts as blank: the question and the
    /// kept options are sent as typed.
    pub fn validate(&self) -> Result<CreatePollRequest, FormError> {
        if self.question.trim().is_empty() {
            return Err(FormError::EmptyQuestion);
        }

        let options: Vec<String> = self
            .options
            .iter()
            .filter(|o| !o.trim().is_empty())
            .cloned()
            .collect();
        if options.len() < MIN_OPTIONS {
            return Err(FormError::TooFewOptions);
        }
        if options.len() > MAX_OPTIONS {
            return Err(FormError::TooManyOptions);
        }

        Ok(CreatePollRequest {
            question: self.question.clone(),
            options,
            expires_in: self.expires_in,
            hide_results: self.hide_results,
            is_private: self.is_private,
        })
    }

    /// Validate, then create the poll. Nothing is sent when validation fails.
    pub async fn submit<A: PollApi>(&self, api: &A) -> Result<Poll, FormError> {
        let request = self.validate()?;
        match api.create_poll(&request).await {
            Ok(poll) => {
                tracing::info!(poll_id = %poll.id, "poll created");
                Ok(poll)
            }
            Err(e) => {
                tracing::warn!("poll creation failed: {e}");
                Err(FormError::Submit)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeApi;

    #[test]
    fn starts_with_two_blank_private_options() {
        let form = PollForm::default();
        assert_eq!(form.options(), &["", ""]);
        assert!(form.is_private);
        assert!(!form.hide_results);
        assert_eq!(form.expires_in, ExpiresIn::OneDay);
        assert!(!form.can_remove_option());
    }

    #[test]
    fn add_option_is_disabled_at_ten() {
        let mut form = PollForm::default();
        while form.add_option() {}
        assert_eq!(form.options().len(), MAX_OPTIONS);
        assert!(!form.can_add_option());
        assert!(!form.add_option());
        assert_eq!(form.options().len(), MAX_OPTIONS);
    }

    #[test]
    fn remove_option_keeps_two() {
        let mut form = PollForm::with_options("Q", ["a", "b", "c"]).expect("form");
        assert!(form.remove_option(1));
        assert_eq!(form.options(), &["a", "c"]);
        assert!(!form.remove_option(0));
        assert!(!form.remove_option(5));
    }

    #[test]
    fn with_options_rejects_an_eleventh_option() {
        let texts: Vec<String> = (1..=11).map(|i| format!("option {i}")).collect();
        assert_eq!(
            PollForm::with_options("Q", texts).expect_err("too many"),
            FormError::TooManyOptions
        );
    }

    #[test]
    fn blank_question_is_rejected() {
        let form = PollForm::with_options("   ", ["a", "b"]).expect("form");
        assert_eq!(form.validate(), Err(FormError::EmptyQuestion));
    }

    #[test]
    fn blank_options_are_filtered_before_counting() {
        let mut form = PollForm::with_options("Pizza or Tacos?", ["Pizza", "  "]).expect("form");
        assert_eq!(form.validate(), Err(FormError::TooFewOptions));
        assert_eq!(
            FormError::TooFewOptions.to_string(),
            "Please provide at least two options"
        );

        form.add_option();
        form.set_option(2, "Tacos");
        let req = form.validate().expect("valid");
        assert_eq!(req.question, "Pizza or Tacos?");
        assert_eq!(req.options, vec!["Pizza", "Tacos"]);
    }

    #[test]
    fn kept_text_is_sent_as_typed() {
        let form = PollForm::with_options(" Pizza or Tacos? ", ["Pizza ", "", " Tacos"]).expect("form");
        let req = form.validate().expect("valid");
        assert_eq!(req.question, " Pizza or Tacos? ");
        assert_eq!(req.options, vec!["Pizza ", " Tacos"]);
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_the_api() {
        let api = FakeApi::default();
        let form = PollForm::with_options("Q", ["only one"]).expect("form");
        assert_eq!(form.submit(&api).await, Err(FormError::TooFewOptions));
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn submit_sends_the_filled_request() {
        let api = FakeApi::default();
        let mut form = PollForm::with_options("Pizza or Tacos?", ["Pizza", "Tacos"]).expect("form");
        form.toggle_hide_results();
        let poll = form.submit(&api).await.expect("created");

        assert_eq!(poll.options.len(), 2);
        assert!(poll.options.iter().all(|o| o.votes == 0));
        let sent = api.created();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].expires_in.hours(), 24);
        assert!(sent[0].hide_results);
        assert!(sent[0].is_private);
    }

    #[tokio::test]
    async fn network_failure_keeps_the_draft() {
        let api = FakeApi::default();
        api.set_failing(true);
        let form = PollForm::with_options("Pizza or Tacos?", ["Pizza", "Tacos"]).expect("form");
        let before = form.clone();
        let err = form.submit(&api).await.expect_err("offline");
        assert_eq!(err.to_string(), "Failed to create poll. Please try again.");
        assert_eq!(form, before);
    }
}
