//! Fixed demonstration data inserted by `seed` into an empty store.

use chrono::NaiveDate;

pub struct SeedMilestone {
    pub name: &'static str,
    pub due_date: (i32, u32, u32),
    pub owner: &'static str,
    pub status: &'static str,
}

pub struct SeedCycle {
    pub name: &'static str,
    pub start_date: (i32, u32, u32),
    pub end_date: (i32, u32, u32),
    pub status: &'static str,
    pub owner: &'static str,
    pub milestones: &'static [SeedMilestone],
    pub notes: &'static [&'static str],
}

pub const SEED_CYCLES: &[SeedCycle] = &[
    SeedCycle {
        name: "Spring 2026 Scholarship Cycle",
        start_date: (2026, 2, 1),
        end_date: (2026, 6, 30),
        status: "in-progress",
        owner: "Program Ops",
        milestones: &[
            SeedMilestone {
                name: "Application window launch",
                due_date: (2026, 2, 5),
                owner: "Community Team",
                status: "complete",
            },
            SeedMilestone {
                name: "Review sprint #1",
                due_date: (2026, 3, 10),
                owner: "Review Leads",
                status: "in-progress",
            },
        ],
        notes: &[
            "Ensure reviewer onboarding is complete by Feb 12.",
            "Confirm award budget ceiling with finance.",
        ],
    },
    SeedCycle {
        name: "Fall 2026 Scholarship Cycle",
        start_date: (2026, 8, 1),
        end_date: (2026, 12, 15),
        status: "planned",
        owner: "Scholar Success",
        milestones: &[SeedMilestone {
            name: "Scholar outreach kickoff",
            due_date: (2026, 7, 15),
            owner: "Engagement",
            status: "planned",
        }],
        notes: &["Draft outreach playbook for August cohort."],
    },
];

/// Converts a seed date tuple. Seed dates are literals, so failure is a bug
/// in this table and surfaces as `None` to the caller.
pub fn seed_date((year, month, day): (i32, u32, u32)) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_seed_dates_are_valid() {
        for cycle in SEED_CYCLES {
            assert!(seed_date(cycle.start_date).is_some());
            assert!(seed_date(cycle.end_date).is_some());
            for milestone in cycle.milestones {
                assert!(seed_date(milestone.due_date).is_some());
            }
        }
    }

    #[test]
    fn seeds_two_cycles() {
        assert_eq!(SEED_CYCLES.len(), 2);
    }
}
