use crate::{contract::Mutation, errors::VoteError, Result};

pub const MIN_CANDIDATE_AGE: u64 = 18;

/// Candidate registration form, as typed by the user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CandidateForm {
    pub name: String,
    pub age: String,
    pub party: String,
    pub image_url: String,
}

impl CandidateForm {
    pub fn validate(&self) -> Result<Mutation> {
        let name = required(&self.name, "Candidate name")?;
        let party = required(&self.party, "Party affiliation")?;
        let age = validate_age(&self.age)?;
        let image_url = required(&self.image_url, "Candidate photo")?;
        Ok(Mutation::AddCandidate {
            name,
            age,
            party,
            image_url,
        })
    }
}

pub fn validate_age(age: &str) -> Result<u64> {
    match age.trim().parse::<i64>() {
        Ok(age) if age >= MIN_CANDIDATE_AGE as i64 => Ok(age as u64),
        _ => Err(VoteError::Validation(
            "Invalid age - must be 18 or older".into(),
        )),
    }
}

pub fn validate_title(title: &str) -> Result<Mutation> {
    let title = required(title, "Election title")?;
    Ok(Mutation::StartElection { title })
}

pub fn validate_vote(candidate_id: u64, has_voted: bool) -> Result<Mutation> {
    if has_voted {
        return Err(VoteError::AlreadyVoted);
    }
    if candidate_id == 0 {
        return Err(VoteError::Validation("Candidate ids start at 1".into()));
    }
    Ok(Mutation::Vote { candidate_id })
}

fn required(value: &str, field: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(VoteError::Validation(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(age: &str) -> CandidateForm {
        CandidateForm {
            name: "Alice".into(),
            age: age.into(),
            party: "X".into(),
            image_url: "ipfs://CID1".into(),
        }
    }

    #[test]
    fn age_bounds() {
        assert!(form("17").validate().is_err());
        assert!(form("-30").validate().is_err());
        assert!(form("abc").validate().is_err());
        assert!(form("").validate().is_err());
        assert_eq!(validate_age(" 18 ").unwrap(), 18);
    }

    #[test]
    fn valid_form_becomes_add_candidate() {
        assert_eq!(
            form("30").validate().unwrap(),
            Mutation::AddCandidate {
                name: "Alice".into(),
                age: 30,
                party: "X".into(),
                image_url: "ipfs://CID1".into(),
            }
        );
    }

    #[test]
    fn blank_fields_rejected() {
        let mut f = form("30");
        f.party = "   ".into();
        match f.validate() {
            Err(VoteError::Validation(msg)) => assert!(msg.contains("Party")),
            other => panic!("unexpected {:?}", other),
        }
        let mut f = form("30");
        f.image_url.clear();
        assert!(f.validate().is_err());
        assert!(validate_title("").is_err());
    }

    #[test]
    fn double_vote_rejected() {
        assert!(matches!(validate_vote(2, true), Err(VoteError::AlreadyVoted)));
        assert!(validate_vote(0, false).is_err());
        assert_eq!(
            validate_vote(2, false).unwrap(),
            Mutation::Vote { candidate_id: 2 }
        );
    }
}
