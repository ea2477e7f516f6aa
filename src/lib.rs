#![doc = include_str!("../README.md")]

pub mod client;
pub mod config;
pub mod error;
pub mod guard;
pub mod notify;
pub mod session;
pub mod store;
pub mod types;

// Re-exports for convenient access
pub use client::{BingoClient, RetryContext};
pub use config::ApiConfig;
pub use error::Error;
pub use guard::{GuardDecision, NavigationGuard, Prompt, PromptChannel, RouteAccess};
pub use notify::{Notification, Notifier, Severity};
pub use session::Session;
pub use store::{CredentialRecord, CredentialStore, FileStore, MemoryStore, StoreError};
pub use types::{
    Avatar, BingoGrid, ChallengeOutcome, ChallengeStatus, ChallengeTile, ChallengeType,
    CompleteChallenge, LeaderboardEntry, NewUser, ProfileChallenge, ProfileInfo, ProfilePage,
    TilePosition, UpdatePreferences, UserId, UserProfile, UserSearchResult, UserSummary,
    Visibility,
};
