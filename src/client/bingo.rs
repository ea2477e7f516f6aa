//! Bingo grid, challenge interaction and leaderboard endpoints.

use serde::Serialize;

use super::{
    BingoClient, BINGO_GRID_PATH, COMPLETE_CHALLENGE_PATH, LEADERBOARD_PATH, START_CHALLENGE_PATH,
};
use crate::error::Error;
use crate::store::CredentialStore;
use crate::types::{BingoGrid, ChallengeOutcome, CompleteChallenge, LeaderboardEntry, TilePosition};

#[derive(Serialize)]
struct StartRequest {
    position: u8,
}

impl<S: CredentialStore> BingoClient<S> {
    /// Fetch the active bingo grid. Works anonymously; with a session the
    /// tiles additionally carry the user's completion status.
    pub async fn bingo_grid(&self) -> Result<BingoGrid, Error> {
        self.send_authorized("fetch bingo grid", |http| http.get(self.url(BINGO_GRID_PATH)))
            .await
    }

    /// Mark a tile's challenge as started.
    ///
    /// # Errors
    ///
    /// [`Error::Api`] with status 409 if the tile was already started;
    /// callers treat that as non-fatal.
    pub async fn start_challenge(&self, position: TilePosition) -> Result<(), Error> {
        let body = StartRequest {
            position: position.index(),
        };
        self.send_authorized_no_content("start challenge", |http| {
            http.post(self.url(START_CHALLENGE_PATH)).json(&body)
        })
        .await
    }

    /// Submit a challenge completion and collect the awarded points and
    /// any bingo lines it finished.
    ///
    /// # Errors
    ///
    /// [`Error::Api`] with status 409 if the challenge was already
    /// completed (points are only awarded once).
    pub async fn complete_challenge(
        &self,
        completion: &CompleteChallenge,
    ) -> Result<ChallengeOutcome, Error> {
        self.send_authorized("complete challenge", |http| {
            http.patch(self.url(COMPLETE_CHALLENGE_PATH)).json(completion)
        })
        .await
    }

    /// Fetch the public leaderboard. When logged in, the requester's own
    /// row is appended at the end regardless of rank.
    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, Error> {
        self.send_authorized("fetch leaderboard", |http| {
            http.get(self.url(LEADERBOARD_PATH))
        })
        .await
    }
}
