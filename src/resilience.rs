use serde::Serialize;

use crate::results::{TeamMatch, VenueFilter, parse_results_block, team_matches};

/// Half-time lead / deficit conversion, in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ResilienceStats {
    pub home_comeback: f64,
    pub home_dropped: f64,
    pub away_comeback: f64,
    pub away_dropped: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TeamResilience {
    pub led_at_half: u32,
    pub led_not_won: u32,
    pub trailed_at_half: u32,
    pub trailed_not_lost: u32,
}

impl TeamResilience {
    pub fn comeback_pct(&self) -> f64 {
        percent(self.trailed_not_lost, self.trailed_at_half)
    }

    pub fn dropped_pct(&self) -> f64 {
        percent(self.led_not_won, self.led_at_half)
    }
}

/// Only matches with a half-time score count. Goal differences are taken from the
/// team's own perspective; level at half-time counts towards neither bucket.
pub fn team_resilience(matches: &[TeamMatch]) -> TeamResilience {
    let mut out = TeamResilience::default();
    for m in matches {
        let Some((ht_for, ht_against)) = m.half_time else {
            continue;
        };
        let ht_diff = i64::from(ht_for) - i64::from(ht_against);
        let ft_diff = i64::from(m.scored) - i64::from(m.conceded);
        if ht_diff > 0 {
            out.led_at_half += 1;
            if ft_diff <= 0 {
                out.led_not_won += 1;
            }
        } else if ht_diff < 0 {
            out.trailed_at_half += 1;
            if ft_diff >= 0 {
                out.trailed_not_lost += 1;
            }
        }
    }
    out
}

pub fn parse_team_resilience(raw: &str, team: &str, venue: VenueFilter) -> TeamResilience {
    if raw.trim().is_empty() || team.trim().is_empty() {
        return TeamResilience::default();
    }
    let records = parse_results_block(raw);
    team_resilience(&team_matches(&records, team, venue))
}

/// The home team is read from the home side of its own results list, the away team from
/// the away side of its list.
pub fn parse_resilience(
    home_results: &str,
    away_results: &str,
    home_team: &str,
    away_team: &str,
) -> ResilienceStats {
    let home = parse_team_resilience(home_results, home_team, VenueFilter::Home);
    let away = parse_team_resilience(away_results, away_team, VenueFilter::Away);
    ResilienceStats {
        home_comeback: home.comeback_pct(),
        home_dropped: home.dropped_pct(),
        away_comeback: away.comeback_pct(),
        away_dropped: away.dropped_pct(),
    }
}

fn percent(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        f64::from(part) / f64::from(whole) * 100.0
    }
}
