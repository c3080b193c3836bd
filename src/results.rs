//! Raw match-result lists: one `<home> v <away> <ft>-<ft> [(<ht>-<ht>)]` per line.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

static RESULT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        ^\s*
        (?:(?P<date>
            \d{4}-\d{1,2}-\d{1,2}
          | \d{1,2}[./-]\d{1,2}[./-]\d{2,4}
          | \d{1,2}\s+[A-Za-z]{3,9}(?:\s+\d{2,4})?
        )\s+)?
        (?P<home>\S.*?)\s+v\s+(?P<away>\S.*?)\s+
        (?P<fh>\d+)\s*-\s*(?P<fa>\d+)
        (?:\s*\(\s*(?P<hh>\d+)\s*-\s*(?P<ha>\d+)\s*\))?
        \s*$",
    )
    .expect("result line pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamSide {
    Home,
    Away,
}

/// Which side of a record may be attributed to the target team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VenueFilter {
    /// Either side; home is checked first.
    #[default]
    Any,
    Home,
    Away,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResultRecord {
    pub date: Option<String>,
    pub home_team: String,
    pub away_team: String,
    pub ft_home: u32,
    pub ft_away: u32,
    pub half_time: Option<(u32, u32)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Blank,
    NoMatch,
    BadNumber(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineParse {
    Parsed(MatchResultRecord),
    Skipped(SkipReason),
}

/// Goals from the target team's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamMatch {
    pub side: TeamSide,
    pub scored: u32,
    pub conceded: u32,
    pub half_time: Option<(u32, u32)>,
}

impl TeamMatch {
    pub fn points(&self) -> u32 {
        match self.scored.cmp(&self.conceded) {
            std::cmp::Ordering::Greater => 3,
            std::cmp::Ordering::Equal => 1,
            std::cmp::Ordering::Less => 0,
        }
    }
}

impl MatchResultRecord {
    /// Case-insensitive containment of `team` in each side's name, home first.
    pub fn side_of(&self, team: &str, venue: VenueFilter) -> Option<TeamSide> {
        let needle = team.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        let home_hit = self.home_team.to_lowercase().contains(&needle);
        let away_hit = self.away_team.to_lowercase().contains(&needle);
        match venue {
            VenueFilter::Home if home_hit => Some(TeamSide::Home),
            VenueFilter::Away if away_hit => Some(TeamSide::Away),
            VenueFilter::Any if home_hit => Some(TeamSide::Home),
            VenueFilter::Any if away_hit => Some(TeamSide::Away),
            _ => None,
        }
    }

    pub fn for_team(&self, team: &str, venue: VenueFilter) -> Option<TeamMatch> {
        let side = self.side_of(team, venue)?;
        Some(match side {
            TeamSide::Home => TeamMatch {
                side,
                scored: self.ft_home,
                conceded: self.ft_away,
                half_time: self.half_time,
            },
            TeamSide::Away => TeamMatch {
                side,
                scored: self.ft_away,
                conceded: self.ft_home,
                half_time: self.half_time.map(|(h, a)| (a, h)),
            },
        })
    }
}

pub fn parse_result_line(line: &str) -> LineParse {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineParse::Skipped(SkipReason::Blank);
    }
    let Some(caps) = RESULT_RE.captures(trimmed) else {
        return LineParse::Skipped(SkipReason::NoMatch);
    };

    let num = |name: &str| -> Result<Option<u32>, String> {
        match caps.name(name) {
            Some(m) => m.as_str().parse::<u32>().map(Some).map_err(|_| m.as_str().to_string()),
            None => Ok(None),
        }
    };

    let parsed = (|| {
        let ft_home = num("fh")?.unwrap_or_default();
        let ft_away = num("fa")?.unwrap_or_default();
        let half_time = match (num("hh")?, num("ha")?) {
            (Some(h), Some(a)) => Some((h, a)),
            _ => None,
        };
        Ok::<_, String>((ft_home, ft_away, half_time))
    })();

    match parsed {
        Ok((ft_home, ft_away, half_time)) => LineParse::Parsed(MatchResultRecord {
            date: caps.name("date").map(|m| m.as_str().trim().to_string()),
            home_team: caps["home"].trim().to_string(),
            away_team: caps["away"].trim().to_string(),
            ft_home,
            ft_away,
            half_time,
        }),
        Err(bad) => {
            warn!(line = trimmed, value = %bad, "skipping result line with unreadable score");
            LineParse::Skipped(SkipReason::BadNumber(bad))
        }
    }
}

/// Every line of a pasted results list, in order. Lines that do not parse are skipped.
pub fn parse_results_block(raw: &str) -> Vec<MatchResultRecord> {
    let mut out = Vec::new();
    for line in raw.lines() {
        match parse_result_line(line) {
            LineParse::Parsed(rec) => out.push(rec),
            LineParse::Skipped(SkipReason::Blank) => {}
            LineParse::Skipped(reason) => debug!(line, ?reason, "result line skipped"),
        }
    }
    out
}

/// Records attributable to `team`, from that team's perspective, in list order.
pub fn team_matches(records: &[MatchResultRecord], team: &str, venue: VenueFilter) -> Vec<TeamMatch> {
    records
        .iter()
        .filter_map(|rec| rec.for_team(team, venue))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_prefix_is_split_from_home_team() {
        let LineParse::Parsed(rec) = parse_result_line("12/01/2025 Arsenal v Spurs 2-0 (1-0)") else {
            panic!("line should parse");
        };
        assert_eq!(rec.date.as_deref(), Some("12/01/2025"));
        assert_eq!(rec.home_team, "Arsenal");
        assert_eq!(rec.half_time, Some((1, 0)));
    }

    #[test]
    fn overflowing_score_is_a_bad_number() {
        let res = parse_result_line("A v B 99999999999-1");
        assert!(matches!(res, LineParse::Skipped(SkipReason::BadNumber(_))));
    }
}
