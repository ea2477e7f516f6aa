use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Server-assigned user identifier (`userId` on the wire).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From,
    Into,
)]
#[serde(transparent)]
pub struct UserId(pub i64);

/// Profile visibility, integer-encoded on the wire.
///
/// `0` = crew only, `1` = friends only, `2` = public. Unknown values are
/// rejected on deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Visibility {
    CrewOnly,
    FriendsOnly,
    Public,
}

impl TryFrom<u8> for Visibility {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::CrewOnly),
            1 => Ok(Self::FriendsOnly),
            2 => Ok(Self::Public),
            other => Err(Error::InvalidValue(format!("visibility {other}"))),
        }
    }
}

impl From<Visibility> for u8 {
    fn from(v: Visibility) -> Self {
        match v {
            Visibility::CrewOnly => 0,
            Visibility::FriendsOnly => 1,
            Visibility::Public => 2,
        }
    }
}

/// Validated avatar index (0..=5).
///
/// Guaranteed in range by construction: holding an `Avatar` proves the
/// index is displayable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, Into)]
#[serde(try_from = "u8", into = "u8")]
pub struct Avatar(u8);

impl Avatar {
    #[must_use]
    pub fn index(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Avatar {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value <= 5 {
            Ok(Self(value))
        } else {
            Err(Error::InvalidValue(format!("avatar index {value}")))
        }
    }
}

/// Validated bingo tile position (0..=15, row-major on a 4×4 grid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Into)]
#[serde(try_from = "u8", into = "u8")]
pub struct TilePosition(u8);

impl TilePosition {
    #[must_use]
    pub fn index(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for TilePosition {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value < 16 {
            Ok(Self(value))
        } else {
            Err(Error::InvalidValue(format!("tile position {value}")))
        }
    }
}

/// Current user profile as served by `GET /user/me/` (camelCase wire form).
///
/// `is_superuser` is the elevation flag: an elevated session is a logged-in
/// session whose profile carries it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: UserId,
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub bio: String,
    pub total_points: i64,
    pub email: String,
    pub visibility: Visibility,
    pub avatar: Avatar,
    #[serde(default)]
    pub is_superuser: bool,
}

/// Registration request body (`POST /user/register/`, snake_case wire form).
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Preference update body (`PUT /user/update/`).
#[derive(Debug, Clone, Serialize)]
pub struct UpdatePreferences {
    pub avatar: Avatar,
    pub bio: String,
    pub visibility: Visibility,
}

/// Minimal user record inside a search result.
#[derive(Debug, Clone, Deserialize)]
pub struct UserSummary {
    pub user_id: UserId,
    pub username: String,
    pub avatar: Avatar,
}

/// One row of a username search, including friendship status relative to
/// the requesting user.
#[derive(Debug, Clone, Deserialize)]
pub struct UserSearchResult {
    pub user_data: UserSummary,
    pub status: String,
    #[serde(default)]
    pub friendship_id: Option<i64>,
}

/// Public slice of a user's profile page.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileInfo {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub bio: String,
    pub total_points: i64,
    pub avatar: Avatar,
}

/// A started-or-completed challenge shown on a profile page: tile
/// interaction data merged with the challenge it points at.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileChallenge {
    pub name: String,
    pub description: String,
    pub challenge_type: ChallengeType,
    pub points: i64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date_started: Option<time::OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date_completed: Option<time::OffsetDateTime>,
}

/// Profile page response. `permission` is false when the target user's
/// visibility excludes the requester; `challenges` is empty in that case.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfilePage {
    pub user_info: ProfileInfo,
    pub challenges: Vec<ProfileChallenge>,
    pub permission: bool,
}

/// Challenge category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeType {
    #[serde(alias = "Connect")]
    Connect,
    #[serde(alias = "Understand")]
    Understand,
    #[serde(alias = "Act")]
    Act,
}

/// Per-user completion state of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChallengeStatus {
    #[serde(rename = "not started")]
    NotStarted,
    #[serde(rename = "started")]
    Started,
    #[serde(rename = "completed")]
    Completed,
}

/// One tile of the active bingo grid. `status` is present only when the
/// grid was fetched with an authenticated session.
#[derive(Debug, Clone, Deserialize)]
pub struct ChallengeTile {
    pub name: String,
    pub description: String,
    pub challenge_type: ChallengeType,
    pub points: i64,
    #[serde(default)]
    pub status: Option<ChallengeStatus>,
}

/// The active bingo grid (`GET /bingo/`): 16 tiles, row-major.
#[derive(Debug, Clone, Deserialize)]
pub struct BingoGrid {
    pub grid_id: i64,
    pub challenges: Vec<ChallengeTile>,
}

/// Challenge completion request body (`PATCH /challenge/complete/`).
#[derive(Debug, Clone, Serialize)]
pub struct CompleteChallenge {
    pub position: TilePosition,
    pub consent: bool,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Points and bingo lines awarded by a completion. Row/column/diagonal
/// fields are `-1` when no bingo was achieved on that axis.
#[derive(Debug, Clone, Deserialize)]
pub struct ChallengeOutcome {
    pub challenge_points: i64,
    pub bingo_points: i64,
    pub bingo_rows: i32,
    pub bingo_cols: i32,
    pub bingo_diag: i32,
    pub full_bingo: bool,
}

/// One leaderboard row. When the requester is logged in, their own row is
/// appended at the end regardless of rank, so usernames may repeat.
#[derive(Debug, Clone, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub total_points: i64,
    #[serde(default)]
    pub rank: Option<i64>,
}
