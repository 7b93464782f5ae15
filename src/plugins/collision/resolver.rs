//! AABB collision sweep over category groups.
//!
//! The resolver is plain data: it owns the rule table and the per-frame check
//! budget, and turns groups of active bodies into [`CollisionResult`]s. It never
//! applies anything; the resolve step does that.

use std::collections::BTreeMap;

use bevy::platform::collections::HashMap;
use bevy::prelude::*;

use crate::common::category::Category;

use super::rules::{default_rules, CategoryPair, CollisionError, CollisionResult, CollisionRule, Contact};

/// One active entity as the resolver sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionBody {
    pub entity: Entity,
    pub category: Category,
    pub bounds: Rect,
    /// Damage payload carried by bullets; zero for everything else.
    pub damage: i32,
}

/// Active bodies keyed by category. Ordered so sweeps are deterministic.
pub type CollisionGroups = BTreeMap<Category, Vec<CollisionBody>>;

/// Strict overlap: boxes that only share an edge do not collide.
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.min.x < b.max.x && a.max.x > b.min.x && a.min.y < b.max.y && a.max.y > b.min.y
}

/// Everything one sweep produced.
#[derive(Debug, Default)]
pub struct Sweep {
    pub results: Vec<CollisionResult>,
    /// Pairwise box tests performed.
    pub checks: usize,
    /// The budget ran out; remaining pairs wait for the next frame.
    pub budget_exhausted: bool,
    pub callback_errors: Vec<CollisionError>,
}

#[derive(Resource, Debug)]
pub struct CollisionResolver {
    rules: HashMap<CategoryPair, CollisionRule>,
    check_budget: usize,
}

impl CollisionResolver {
    /// Empty rule table: nothing collides until a rule is registered.
    pub fn new(check_budget: usize) -> Self {
        Self { rules: HashMap::default(), check_budget }
    }

    pub fn with_default_rules(check_budget: usize) -> Self {
        let mut resolver = Self::new(check_budget);
        for rule in default_rules() {
            if let Err(err) = resolver.register(rule) {
                error!("default collision rule rejected: {err}");
            }
        }
        resolver
    }

    /// Add or replace the rule for an unordered pair. Returns the replaced rule.
    pub fn register(&mut self, rule: CollisionRule) -> Result<Option<CollisionRule>, CollisionError> {
        let pair = rule.pair();
        if pair.is_self_pair() {
            return Err(CollisionError::SelfPair(rule.a));
        }
        Ok(self.rules.insert(pair, rule))
    }

    pub fn rule(&self, a: Category, b: Category) -> Option<&CollisionRule> {
        self.rules.get(&CategoryPair::new(a, b))
    }

    /// Toggle a registered rule. Returns false when no rule exists for the pair.
    pub fn set_enabled(&mut self, a: Category, b: Category, enabled: bool) -> bool {
        match self.rules.get_mut(&CategoryPair::new(a, b)) {
            Some(rule) => {
                rule.enabled = enabled;
                true
            }
            None => false,
        }
    }

    pub fn check_budget(&self) -> usize {
        self.check_budget
    }

    pub fn set_check_budget(&mut self, budget: usize) {
        self.check_budget = budget;
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn check_all(&self, groups: &CollisionGroups) -> Vec<CollisionResult> {
        self.sweep(groups).results
    }

    pub fn sweep(&self, groups: &CollisionGroups) -> Sweep {
        let mut sweep = Sweep::default();
        let present: Vec<Category> = groups
            .iter()
            .filter(|(_, bodies)| !bodies.is_empty())
            .map(|(category, _)| *category)
            .collect();

        for (i, &first) in present.iter().enumerate() {
            for &second in &present[i + 1..] {
                let Some(rule) = self.rule(first, second) else {
                    continue;
                };
                if !rule.enabled {
                    continue;
                }

                let (Some(side_a), Some(side_b)) = (groups.get(&rule.a), groups.get(&rule.b)) else {
                    continue;
                };
                if !self.sweep_pair(rule, side_a, side_b, &mut sweep) {
                    return sweep;
                }
            }
        }
        sweep
    }

    /// Returns false once the budget is spent.
    fn sweep_pair(
        &self,
        rule: &CollisionRule,
        side_a: &[CollisionBody],
        side_b: &[CollisionBody],
        sweep: &mut Sweep,
    ) -> bool {
        for a in side_a {
            for b in side_b {
                if sweep.checks >= self.check_budget {
                    sweep.budget_exhausted = true;
                    return false;
                }
                sweep.checks += 1;

                if !overlaps(&a.bounds, &b.bounds) {
                    continue;
                }

                let base = rule.static_result(a, b);
                let Some(custom) = &rule.custom else {
                    sweep.results.push(base);
                    continue;
                };
                match custom(&Contact { a: *a, b: *b, base }) {
                    Ok(Some(result)) => sweep.results.push(result),
                    Ok(None) => {}
                    Err(err) => {
                        warn!("{err}");
                        sweep.callback_errors.push(err);
                    }
                }
            }
        }
        true
    }
}
