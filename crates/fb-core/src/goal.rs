//! Goal targets and achievement evaluation.
//!
//! Targets are configured per day (focus minutes) and per week (sessions).
//! [`UserGoals::goal_for`] is the one place those targets are scaled to the
//! viewing period before evaluation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::bucket::PeriodAggregate;
use crate::types::ValidationError;
use crate::units::ratio_percent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    /// Accumulated focus minutes.
    FocusTime,
    /// Completed focus sessions.
    Sessions,
}

impl GoalType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FocusTime => "focus_time",
            Self::Sessions => "sessions",
        }
    }
}

impl fmt::Display for GoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "focus_time" | "focusTime" => Ok(Self::FocusTime),
            "sessions" => Ok(Self::Sessions),
            _ => Err(ValidationError::UnknownGoalType {
                value: s.to_string(),
            }),
        }
    }
}

/// A target for one viewing period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    #[serde(rename = "type")]
    pub goal_type: GoalType,
    pub value: u64,
}

/// Length of the period a goal is evaluated over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalPeriod {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl GoalPeriod {
    /// Nominal day count used to scale per-day targets.
    #[must_use]
    pub const fn days(self) -> u64 {
        match self {
            Self::Daily => 1,
            Self::Weekly => 7,
            Self::Monthly => 30,
            Self::Yearly => 365,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl fmt::Display for GoalPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The user's configured goals, as returned by the stats backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserGoals {
    #[serde(alias = "dailyGoalMinutes")]
    pub daily_goal_minutes: u64,
    #[serde(alias = "weeklyGoalSessions")]
    pub weekly_goal_sessions: u64,
}

impl UserGoals {
    /// Target of `goal_type` scaled to `period`.
    ///
    /// Daily focus minutes scale by the period's day count. Weekly sessions
    /// scale by `days / 7`, rounded up so a non-zero weekly goal never turns
    /// into a zero daily one. Both saturate at `u64::MAX`.
    pub const fn goal_for(&self, goal_type: GoalType, period: GoalPeriod) -> Goal {
        let value = match goal_type {
            GoalType::FocusTime => self.daily_goal_minutes.saturating_mul(period.days()),
            GoalType::Sessions => self
                .weekly_goal_sessions
                .saturating_mul(period.days())
                .div_ceil(7),
        };
        Goal { goal_type, value }
    }
}

/// How far a period's aggregate has come toward a goal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalAchievement {
    pub goal_type: GoalType,
    pub goal_value: u64,
    pub current_value: u64,
    /// Percentage, uncapped above 100.
    pub achievement_rate: f64,
    pub is_achieved: bool,
    pub remaining: u64,
}

/// Evaluate `goal` against a period aggregate.
///
/// A zero goal yields 0% with no progress and 100% with any progress, never
/// NaN or infinity.
pub fn evaluate_goal(aggregate: &PeriodAggregate, goal: &Goal) -> GoalAchievement {
    let current_value = match goal.goal_type {
        GoalType::FocusTime => aggregate.focus_minutes,
        GoalType::Sessions => u64::from(aggregate.session_count),
    };

    let achievement_rate = match (goal.value, current_value) {
        (0, 0) => 0.0,
        (0, _) => 100.0,
        (target, current) => ratio_percent(current, target),
    };

    GoalAchievement {
        goal_type: goal.goal_type,
        goal_value: goal.value,
        current_value,
        achievement_rate,
        is_achieved: current_value >= goal.value,
        remaining: goal.value.saturating_sub(current_value),
    }
}

#[cfg(test)]
#[expect(
    clippy::float_cmp,
    reason = "exact equality intended for boundary tests"
)]
mod tests {
    use super::*;

    fn aggregate(focus_minutes: u64, session_count: u32) -> PeriodAggregate {
        PeriodAggregate {
            focus_minutes,
            break_minutes: 0,
            session_count,
        }
    }

    fn focus_goal(value: u64) -> Goal {
        Goal {
            goal_type: GoalType::FocusTime,
            value,
        }
    }

    #[test]
    fn zero_goal_with_progress_is_full() {
        let result = evaluate_goal(&aggregate(50, 2), &focus_goal(0));
        assert_eq!(result.achievement_rate, 100.0);
        assert!(result.is_achieved);
        assert_eq!(result.remaining, 0);
        assert_eq!(result.current_value, 50);
    }

    #[test]
    fn zero_goal_without_progress_is_zero_percent() {
        let result = evaluate_goal(&aggregate(0, 0), &focus_goal(0));
        assert_eq!(result.achievement_rate, 0.0);
        assert!(!result.achievement_rate.is_nan());
    }

    #[test]
    fn reaching_goal_exactly_is_one_hundred() {
        let result = evaluate_goal(&aggregate(120, 4), &focus_goal(120));
        assert_eq!(result.achievement_rate, 100.0);
        assert!(result.is_achieved);
        assert_eq!(result.remaining, 0);
    }

    #[test]
    fn partial_progress_reports_remaining() {
        let result = evaluate_goal(&aggregate(30, 1), &focus_goal(120));
        assert_eq!(result.achievement_rate, 25.0);
        assert!(!result.is_achieved);
        assert_eq!(result.remaining, 90);
    }

    #[test]
    fn over_achievement_is_uncapped() {
        let result = evaluate_goal(&aggregate(300, 12), &focus_goal(120));
        assert_eq!(result.achievement_rate, 250.0);
        assert_eq!(result.remaining, 0);
    }

    #[test]
    fn sessions_goal_reads_session_count() {
        let goal = Goal {
            goal_type: GoalType::Sessions,
            value: 20,
        };
        let result = evaluate_goal(&aggregate(9999, 5), &goal);
        assert_eq!(result.current_value, 5);
        assert_eq!(result.achievement_rate, 25.0);
        assert_eq!(result.remaining, 15);
    }

    #[test]
    fn goal_for_scales_daily_minutes() {
        let goals = UserGoals {
            daily_goal_minutes: 120,
            weekly_goal_sessions: 20,
        };
        assert_eq!(goals.goal_for(GoalType::FocusTime, GoalPeriod::Daily).value, 120);
        assert_eq!(goals.goal_for(GoalType::FocusTime, GoalPeriod::Weekly).value, 840);
        assert_eq!(goals.goal_for(GoalType::FocusTime, GoalPeriod::Monthly).value, 3600);
        assert_eq!(goals.goal_for(GoalType::FocusTime, GoalPeriod::Yearly).value, 43_800);
    }

    #[test]
    fn goal_for_scales_weekly_sessions() {
        let goals = UserGoals {
            daily_goal_minutes: 120,
            weekly_goal_sessions: 20,
        };
        assert_eq!(goals.goal_for(GoalType::Sessions, GoalPeriod::Weekly).value, 20);
        // 20 / 7 = 2.86, rounded up
        assert_eq!(goals.goal_for(GoalType::Sessions, GoalPeriod::Daily).value, 3);
        // 20 * 30 / 7 = 85.7, rounded up
        assert_eq!(goals.goal_for(GoalType::Sessions, GoalPeriod::Monthly).value, 86);
    }

    #[test]
    fn goal_for_saturates_huge_targets() {
        let goals = UserGoals {
            daily_goal_minutes: u64::MAX,
            weekly_goal_sessions: u64::MAX,
        };
        assert_eq!(
            goals.goal_for(GoalType::FocusTime, GoalPeriod::Yearly).value,
            u64::MAX
        );
        assert_eq!(
            goals.goal_for(GoalType::Sessions, GoalPeriod::Monthly).value,
            u64::MAX.div_ceil(7)
        );

        let result = evaluate_goal(
            &PeriodAggregate::default(),
            &goals.goal_for(GoalType::FocusTime, GoalPeriod::Weekly),
        );
        assert!(!result.is_achieved);
        assert_eq!(result.remaining, u64::MAX);
    }

    #[test]
    fn user_goals_accept_both_casings() {
        let snake: UserGoals =
            serde_json::from_str(r#"{"daily_goal_minutes": 90, "weekly_goal_sessions": 10}"#)
                .unwrap();
        let camel: UserGoals =
            serde_json::from_str(r#"{"dailyGoalMinutes": 90, "weeklyGoalSessions": 10}"#).unwrap();
        assert_eq!(snake, camel);
    }

    #[test]
    fn goal_wire_shape() {
        let goal: Goal = serde_json::from_str(r#"{"type": "focus_time", "value": 0}"#).unwrap();
        assert_eq!(goal, focus_goal(0));
        assert_eq!("sessions".parse::<GoalType>().unwrap(), GoalType::Sessions);
        assert!("calories".parse::<GoalType>().is_err());
    }
}
