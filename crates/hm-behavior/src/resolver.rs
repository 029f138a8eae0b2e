//! Activity → destination AOI.
//!
//! Three strategies, selected by activity:
//!
//! | Activity                       | Strategy                                        |
//! |--------------------------------|-------------------------------------------------|
//! | `work`, `go_home`              | fixed anchor                                    |
//! | assisted (lunch, social, ...)  | candidates shown to the completion service      |
//! | everything else                | nearest matching POI                            |
//!
//! POI searches exclude the current location and the recent destinations;
//! when that leaves nothing, only the current location is excluded.  Ids
//! that are not valid AOIs are never returned.

use std::fmt::Write as _;

use hm_core::{Activity, AgentRng, AoiId, Phase, XyPoint};
use hm_llm::{CallPolicy, CompletionRequest, TextCompletionService, decode_destination};
use hm_spatial::{Poi, PoiIndex};
use tracing::{debug, warn};

use crate::{Location, Profile, RecentDestinations, ResolverConfig};

/// Agent state the resolver reads.
#[derive(Copy, Clone)]
pub struct ResolveContext<'a> {
    pub location: Location,
    pub position: XyPoint,
    pub recent:   &'a RecentDestinations,
    pub phase:    Phase,
    pub profile:  &'a Profile,
}

/// Borrowed view over the resolver's configuration and collaborators.
pub struct DestinationResolver<'a, P: ?Sized, S> {
    pub config:     &'a ResolverConfig,
    pub policy:     &'a CallPolicy,
    pub pois:       &'a P,
    pub completion: &'a S,
}

impl<'a, P, S> DestinationResolver<'a, P, S>
where
    P: PoiIndex + ?Sized,
    S: TextCompletionService,
{
    pub fn new(config: &'a ResolverConfig, policy: &'a CallPolicy, pois: &'a P, completion: &'a S) -> Self {
        Self { config, policy, pois, completion }
    }

    pub async fn resolve(
        &self,
        activity: Activity,
        ctx:      &ResolveContext<'_>,
        rng:      &mut AgentRng,
    ) -> Option<AoiId> {
        let resolved = match activity {
            Activity::Work => self.anchor(ctx.location.work),
            Activity::GoHome => self.anchor(ctx.location.home),
            a if self.config.is_assisted(a) => self.assisted(a, ctx, rng).await,
            a => self.nearest(a, ctx),
        };
        resolved.filter(|id| id.is_valid())
    }

    /// A fixed anchor, provided the map knows where it is.
    fn anchor(&self, aoi: Option<AoiId>) -> Option<AoiId> {
        aoi.filter(|&id| self.pois.aoi_position(id).is_some())
    }

    /// Candidate POIs for `activity`, with the exclusion rules applied.
    pub fn candidates(&self, activity: Activity, ctx: &ResolveContext<'_>) -> Vec<Poi> {
        let categories: Vec<&str> = self
            .config
            .categories_for(activity)
            .iter()
            .map(String::as_str)
            .collect();
        if categories.is_empty() {
            return Vec::new();
        }
        let found = self
            .pois
            .nearby(ctx.position, self.config.radius_for(activity), &categories);

        let current = ctx.location.current;
        let (fresh, stale): (Vec<Poi>, Vec<Poi>) = found
            .into_iter()
            .filter(|p| p.aoi.is_valid() && Some(p.aoi) != current)
            .partition(|p| !ctx.recent.contains(p.aoi));
        if fresh.is_empty() { stale } else { fresh }
    }

    fn nearest(&self, activity: Activity, ctx: &ResolveContext<'_>) -> Option<AoiId> {
        self.candidates(activity, ctx)
            .into_iter()
            .min_by(|a, b| {
                a.position
                    .distance_2(ctx.position)
                    .total_cmp(&b.position.distance_2(ctx.position))
                    .then(a.id.cmp(&b.id))
            })
            .map(|p| p.aoi)
    }

    async fn assisted(
        &self,
        activity: Activity,
        ctx:      &ResolveContext<'_>,
        rng:      &mut AgentRng,
    ) -> Option<AoiId> {
        let mut options: Vec<Poi> = Vec::new();
        for poi in self.candidates(activity, ctx) {
            if options.len() == self.config.max_candidates {
                break;
            }
            if options.iter().all(|o| o.aoi != poi.aoi) {
                options.push(poi);
            }
        }
        if options.is_empty() {
            return None;
        }
        let ids: Vec<AoiId> = options.iter().map(|p| p.aoi).collect();

        let request = destination_request(activity, ctx, &options);
        match self
            .policy
            .call(self.completion, &request, "destination", |raw| decode_destination(raw, &ids))
            .await
        {
            Ok(id) => {
                debug!(%activity, destination = %id, "assisted destination accepted");
                Some(id)
            }
            Err(e) => {
                warn!(%activity, error = %e, candidates = ids.len(), "destination assist failed, picking at random");
                rng.choose(&ids).copied()
            }
        }
    }
}

fn destination_request(activity: Activity, ctx: &ResolveContext<'_>, options: &[Poi]) -> CompletionRequest {
    let system = format!(
        "You pick the most suitable place for a resident's {activity}. Answer with one JSON object."
    );
    let current = ctx
        .location
        .current
        .map_or_else(|| "unknown".to_owned(), |id| id.0.to_string());

    let mut user = format!(
        "Resident: age {}, income ${:.0}\nConditions: {}\nCurrent location: AOI {current}\nOptions:\n",
        ctx.profile.age,
        ctx.profile.income,
        ctx.phase.as_token(),
    );
    for poi in options {
        let _ = writeln!(user, "- {} ({}) - AOI {}", poi.name, poi.category, poi.aoi.0);
    }
    user.push_str(r#"Return JSON: {"reason": "<why>", "aoi_id": <ID>}"#);
    CompletionRequest::new(system, user)
}
