use std::collections::HashSet;

use bson::{oid::ObjectId, Document};
use rosterline_db::models::{Team, User};
use tracing::{debug, warn};

use super::view::PendingRequest;

/// Teams the viewer belongs to and teams holding a pending join request
/// from them.
#[derive(Debug, Clone, Default)]
pub struct TeamResolution {
    pub teams: Vec<Team>,
    pub pending_requests: Vec<PendingRequest>,
}

impl TeamResolution {
    pub fn team_ids(&self) -> Vec<ObjectId> {
        self.teams.iter().filter_map(|t| t.id).collect()
    }
}

/// Filters a full team scan down to what concerns `user`.
///
/// Membership is roster containment or the team id appearing in the user's
/// own team list. Documents that do not decode as a team are skipped.
pub fn resolve_teams(user: &User, documents: Vec<Document>) -> TeamResolution {
    let Some(user_id) = user.id else {
        return TeamResolution::default();
    };

    let mut resolution = TeamResolution::default();
    let mut pending_seen = HashSet::new();

    for document in documents {
        let raw_id = document.get_object_id("_id").ok();
        let team: Team = match bson::from_document(document) {
            Ok(team) => team,
            Err(e) => {
                warn!(team_id = ?raw_id, error = %e, "Skipping malformed team document");
                continue;
            }
        };
        let Some(team_id) = team.id else {
            warn!(name = %team.name, "Skipping team document without _id");
            continue;
        };

        if let Some(request) = team.pending_request_for(&user_id) {
            if pending_seen.insert(team_id) {
                resolution.pending_requests.push(PendingRequest {
                    team_id: team_id.to_hex(),
                    team_name: team.name.clone(),
                    requested_at: request.requested_at.to_chrono(),
                });
            }
        }

        if team.has_member(&user_id) || user.teams.contains(&team_id) {
            resolution.teams.push(team);
        }
    }

    debug!(
        user_id = %user_id,
        teams = resolution.teams.len(),
        pending = resolution.pending_requests.len(),
        "Resolved teams"
    );
    resolution
}
