// src/render.rs
//! Maps ranked results to display rows. Pure: painting happens in `view`.

use crate::types::{RankedResult, ResultSet};

/// Skills shown per candidate; the full list stays in the result set.
pub const MAX_SKILL_TAGS: usize = 5;

pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankTier {
    Gold,
    Silver,
    Bronze,
    Default,
}

impl RankTier {
    pub fn for_rank(rank: u32) -> Self {
        match rank {
            1 => RankTier::Gold,
            2 => RankTier::Silver,
            3 => RankTier::Bronze,
            _ => RankTier::Default,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RankTier::Gold => "gold",
            RankTier::Silver => "silver",
            RankTier::Bronze => "bronze",
            RankTier::Default => "default",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    High,
    Medium,
    Low,
}

impl ScoreTier {
    pub fn for_score(score: f64) -> Self {
        if score >= 70.0 {
            ScoreTier::High
        } else if score >= 40.0 {
            ScoreTier::Medium
        } else {
            ScoreTier::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreTier::High => "high",
            ScoreTier::Medium => "medium",
            ScoreTier::Low => "low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillsCell {
    Tags(Vec<String>),
    NotAvailable,
}

impl SkillsCell {
    pub fn display(&self) -> String {
        match self {
            SkillsCell::Tags(tags) => tags
                .iter()
                .map(|t| format!("[{}]", t))
                .collect::<Vec<_>>()
                .join(" "),
            SkillsCell::NotAvailable => NOT_AVAILABLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRow {
    pub rank: u32,
    pub rank_tier: RankTier,
    pub name: String,
    pub filename: String,
    pub score_label: String,
    pub score_tier: ScoreTier,
    pub skills: SkillsCell,
    pub experience: String,
}

pub fn render(results: &ResultSet) -> Vec<RenderedRow> {
    results.iter().map(render_row).collect()
}

pub fn render_row(result: &RankedResult) -> RenderedRow {
    let skills = if result.skills.is_empty() {
        SkillsCell::NotAvailable
    } else {
        SkillsCell::Tags(result.skills.iter().take(MAX_SKILL_TAGS).cloned().collect())
    };

    let experience = match result.experience() {
        Some(years) => format!("{} years", format_number(years)),
        None => NOT_AVAILABLE.to_string(),
    };

    RenderedRow {
        rank: result.rank,
        rank_tier: RankTier::for_rank(result.rank),
        name: result.name.clone(),
        filename: result.filename.clone(),
        score_label: format!("{}%", format_number(result.score())),
        score_tier: ScoreTier::for_score(result.score()),
        skills,
        experience,
    }
}

/// `5.0` prints as `5`, `87.35` as `87.35`.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
