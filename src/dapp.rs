use std::path::Path;

use crate::{
    config::Config,
    contract::{Confirmation, Mutation, VotingContract},
    dispatch::{Dispatcher, MutationState},
    download::load_election_and_candidates,
    election::Winner,
    net::EthVotingContract,
    pinning::{upload_file, PinningService},
    session::{connect, Session},
    validate::{validate_title, validate_vote, CandidateForm},
    view::{short_hash, NoticeLevel, VotingView},
    Result,
};

pub const REGISTERED: &str = "Candidate registered successfully!";

/// Ties a wallet session to its view state: every action validates
/// locally, dispatches one transaction, reconciles the view and re-reads
/// the contract.
pub struct VotingDapp<C, P> {
    session: Session<C>,
    pinning: P,
    dispatcher: Dispatcher,
    pub view: VotingView,
}

impl<P: PinningService> VotingDapp<EthVotingContract, P> {
    pub async fn connect(config: &Config, pinning: P) -> Result<Self> {
        let session = connect(config).await?;
        let mut dapp = VotingDapp::new(session, pinning);
        dapp.refresh().await?;
        Ok(dapp)
    }

    /// Drop the session and build a fresh one.
    pub async fn reconnect(&mut self, config: &Config) -> Result<()> {
        let session = match connect(config).await {
            Ok(session) => session,
            Err(e) => {
                self.view.report(&e);
                return Err(e);
            }
        };
        self.view = VotingView::connected(session.address, session.is_admin);
        self.session = session;
        self.refresh().await
    }
}

impl<C: VotingContract, P: PinningService> VotingDapp<C, P> {
    pub fn new(session: Session<C>, pinning: P) -> Self {
        let view = VotingView::connected(session.address, session.is_admin);
        VotingDapp {
            session,
            pinning,
            dispatcher: Dispatcher::default(),
            view,
        }
    }

    pub fn session(&self) -> &Session<C> {
        &self.session
    }

    pub fn mutation_state(&self) -> MutationState {
        self.dispatcher.state()
    }

    pub fn is_busy(&self) -> bool {
        self.dispatcher.is_busy()
    }

    pub async fn refresh(&mut self) -> Result<()> {
        match load_election_and_candidates(&self.session.contract, Some(self.session.address)).await
        {
            Ok(snapshot) => {
                self.view.apply_snapshot(snapshot);
                Ok(())
            }
            Err(e) => {
                self.view.banner = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Pin an image and attach it to the registration form.
    pub async fn upload_image(&mut self, path: &Path) -> Result<String> {
        match upload_file(&self.pinning, path).await {
            Ok(uri) => {
                self.view.form.image_url = uri.clone();
                Ok(uri)
            }
            Err(e) => {
                log::error!("Error uploading image: {}", e);
                self.view.notify(NoticeLevel::Error, "Failed to upload image");
                Err(e)
            }
        }
    }

    pub async fn register_candidate(&mut self) -> Result<Confirmation> {
        self.view.status = None;
        let mutation = self
            .session
            .require_admin("Only admin can register candidates")
            .and_then(|_| self.view.form.validate());
        let mutation = self.checked(mutation)?;
        self.view.status = Some("Registering candidate...".to_string());
        let confirmation = self.run(mutation).await?;
        self.view.status = Some(REGISTERED.to_string());
        self.view.form = CandidateForm::default();
        self.finish().await;
        Ok(confirmation)
    }

    pub async fn start_election(&mut self, title: &str) -> Result<Confirmation> {
        let mutation = self
            .session
            .require_admin("Only admin can start an election")
            .and_then(|_| validate_title(title));
        let mutation = self.checked(mutation)?;
        let confirmation = self.run(mutation).await?;
        self.view.notify(NoticeLevel::Success, "Election started");
        self.finish().await;
        Ok(confirmation)
    }

    pub async fn vote(&mut self, candidate_id: u64) -> Result<Confirmation> {
        let mutation = validate_vote(candidate_id, self.view.has_voted).map_err(|e| {
            self.view.notify(NoticeLevel::Error, e.to_string());
            e
        })?;
        let confirmation = self.run(mutation).await?;
        self.view.has_voted = true;
        self.view
            .notify(NoticeLevel::Success, format!("Vote cast for candidate {}", candidate_id));
        self.finish().await;
        Ok(confirmation)
    }

    /// End the election. The winner is captured first since the reset wipes
    /// every candidate.
    pub async fn end_voting_and_reset(&mut self) -> Result<Option<Winner>> {
        let mutation = self
            .session
            .require_admin("Only admin can perform this action")
            .map(|_| Mutation::EndVotingAndReset);
        let mutation = self.checked(mutation)?;

        let winner = match self.capture_winner().await {
            Ok(winner) => winner,
            Err(e) => {
                self.view.report(&e);
                self.view.notify(NoticeLevel::Error, "Failed to end voting");
                return Err(e);
            }
        };
        self.view
            .notify(NoticeLevel::Loading, "Ending voting session...");
        let confirmed = self.run(mutation).await;
        self.view.dismiss(NoticeLevel::Loading);
        confirmed?;
        self.view.winner = winner.clone();
        self.view
            .notify(NoticeLevel::Success, "Voting ended successfully");
        self.finish().await;
        Ok(winner)
    }

    /// Winner to show once the reset lands. `None` only for an election
    /// without candidates; any read failure aborts, as the reset would
    /// make the result unreadable.
    async fn capture_winner(&self) -> Result<Option<Winner>> {
        if self.session.contract.candidates_count().await? == 0 {
            log::warn!("No candidates, ending without a winner");
            return Ok(None);
        }
        self.fetch_winner().await.map(Some)
    }

    /// Current leader, with the image taken from its candidate record.
    pub async fn fetch_winner(&self) -> Result<Winner> {
        let contract = &self.session.contract;
        let mut winner = contract.get_winner().await?;
        winner.image_url = contract.get_candidate(winner.id).await?.image_url;
        Ok(winner)
    }

    fn checked(&mut self, mutation: Result<Mutation>) -> Result<Mutation> {
        mutation.map_err(|e| {
            self.view.report(&e);
            e
        })
    }

    async fn run(&mut self, mutation: Mutation) -> Result<Confirmation> {
        let result = self
            .dispatcher
            .dispatch(
                &self.session.contract,
                self.session.address,
                self.session.is_admin,
                mutation,
            )
            .await;
        match result {
            Ok(confirmation) => {
                log::debug!("confirmed {}", short_hash(&confirmation.tx_hash));
                Ok(confirmation)
            }
            Err(e) => {
                self.view.status = None;
                self.view.report(&e);
                self.dispatcher.acknowledge();
                Err(e)
            }
        }
    }

    async fn finish(&mut self) {
        self.dispatcher.acknowledge();
        if let Err(e) = self.refresh().await {
            log::warn!("Refresh after confirmation failed: {}", e);
        }
    }
}
