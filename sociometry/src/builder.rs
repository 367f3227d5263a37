pub use crate::config::*;

/// A builder for collecting survey responses.
///
/// ```
/// pub use sociometry::builder::Builder;
/// # use sociometry::SociometryErrors;
///
/// let mut builder = Builder::new()
///     .participants(&["Anna".to_string(), "Bob".to_string(), "Clara".to_string()])?;
///
/// builder.add_response_simple("Anna", &["Bob".to_string(), "Clara".to_string(), "".to_string()])?;
/// builder.add_response_simple("Bob", &["Anna".to_string()])?;
///
/// let res = builder.run()?;
/// assert_eq!(res.table[0].name, "Anna");
/// assert_eq!(res.row("Clara").map(|r| r.score), Some(1));
///
/// # Ok::<(), SociometryErrors>(())
/// ```
pub struct Builder {
    pub(crate) _participants: Option<Vec<String>>,
    pub(crate) _responses: Vec<SurveyResponse>,
}

impl Builder {
    pub fn new() -> Builder {
        Builder {
            _participants: None,
            _responses: Vec::new(),
        }
    }

    /// Declares the participants up front.
    ///
    /// This is useful when some participants did not fill in the survey: they can still be
    /// nominated by the others. The declared order becomes the roster order.
    pub fn participants(self, names: &[String]) -> Result<Builder, SociometryErrors> {
        if let Some(row) = names.iter().position(|n| n.is_empty()) {
            return Err(SociometryErrors::EmptyParticipantName { row });
        }
        Ok(Builder {
            _participants: Some(names.to_vec()),
            _responses: self._responses,
        })
    }

    /// Adds a response in which empty strings are blank slots.
    ///
    /// It is the simplest use case for most cases.
    pub fn add_response_simple(
        &mut self,
        name: &str,
        choices: &[String],
    ) -> Result<(), SociometryErrors> {
        let choices: Vec<Option<String>> = choices
            .iter()
            .map(|c| if c.is_empty() { None } else { Some(c.clone()) })
            .collect();
        self.add_response(&SurveyResponse {
            name: name.to_string(),
            choices,
        })
    }

    pub fn add_response(&mut self, response: &SurveyResponse) -> Result<(), SociometryErrors> {
        if response.name.is_empty() {
            return Err(SociometryErrors::EmptyParticipantName {
                row: self._responses.len(),
            });
        }
        if response.choices.len() > NOMINATION_SLOTS {
            return Err(SociometryErrors::TooManyChoices {
                name: response.name.clone(),
                count: response.choices.len(),
            });
        }
        self._responses.push(response.clone());
        Ok(())
    }

    /// All the responses, preceded by an empty response for every declared participant.
    pub fn responses(&self) -> Vec<SurveyResponse> {
        let mut res: Vec<SurveyResponse> = self
            ._participants
            .iter()
            .flatten()
            .map(|name| SurveyResponse {
                name: name.clone(),
                choices: Vec::new(),
            })
            .collect();
        res.extend(self._responses.iter().cloned());
        res
    }

    pub fn run(&self) -> Result<SociometryResult, SociometryErrors> {
        crate::run_sociometry(&self.responses())
    }
}

impl Default for Builder {
    fn default() -> Self {
        Builder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_participants_set_the_roster() {
        let mut builder = Builder::new()
            .participants(&["Zoe".to_string(), "Yann".to_string()])
            .unwrap();
        builder
            .add_response_simple("Yann", &["Zoe".to_string(), "Xavier".to_string()])
            .unwrap();
        let res = builder.run().unwrap();
        let names: Vec<&str> = res.table.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Zoe", "Yann"]);
        assert_eq!(res.dropped_nominations.len(), 1);
    }

    #[test]
    fn rejects_bad_responses() {
        let mut builder = Builder::new();
        assert!(builder.add_response_simple("", &[]).is_err());
        let four: Vec<String> = vec!["a".to_string(); 4];
        assert!(builder.add_response_simple("A", &four).is_err());
        assert!(builder.responses().is_empty());
    }
}
