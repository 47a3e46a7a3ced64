/*
Copyright 2024 San Francisco Compute Company

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

//! Running totals accumulated across report rows

use crate::domain::entities::ReportRow;
use std::collections::BTreeMap;

/// Subscription usage: subscription name -> virtualization class -> amount
///
/// Totals only ever grow, and the order rows are accumulated in does not
/// affect the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionSummary {
    usage: BTreeMap<String, BTreeMap<String, i64>>,
}

impl SubscriptionSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a row's amount to its (subscription, class) bucket
    pub fn accumulate(&mut self, row: &ReportRow) {
        self.add(
            &row.subscription_name,
            &row.virtual_class.to_string(),
            row.amount,
        );
    }

    /// Add an amount to a bucket, creating it at zero if needed
    pub fn add(&mut self, subscription: &str, class: &str, amount: i64) {
        *self
            .usage
            .entry(subscription.to_string())
            .or_default()
            .entry(class.to_string())
            .or_insert(0) += amount;
    }

    /// Fold another summary into this one
    pub fn merge(&mut self, other: &SubscriptionSummary) {
        for (subscription, classes) in &other.usage {
            for (class, amount) in classes {
                self.add(subscription, class, *amount);
            }
        }
    }

    pub fn total_for(&self, subscription: &str, class: &str) -> Option<i64> {
        self.usage.get(subscription)?.get(class).copied()
    }

    /// Subscriptions in name order, each with its per-class totals
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, i64>)> {
        self.usage.iter().map(|(name, classes)| (name.as_str(), classes))
    }

    pub fn len(&self) -> usize {
        self.usage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.usage.is_empty()
    }
}

/// Systems with a false compliance flag, keyed by uuid
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncompliantSet {
    systems: BTreeMap<String, String>,
}

impl IncompliantSet {
    /// Record a system; returns false if it was already present
    pub fn insert(&mut self, uuid: &str, name: &str) -> bool {
        self.systems
            .insert(uuid.to_string(), name.to_string())
            .is_none()
    }

    pub fn get(&self, uuid: &str) -> Option<&str> {
        self.systems.get(uuid).map(String::as_str)
    }

    /// (uuid, name) pairs in uuid order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.systems
            .iter()
            .map(|(uuid, name)| (uuid.as_str(), name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Compliance, NormalizedFacts, VirtualClass};

    fn row(subscription: &str, class: VirtualClass, amount: i64) -> ReportRow {
        ReportRow {
            system_uuid: "u1".to_string(),
            system_name: "host1".to_string(),
            compliant: Compliance::Unknown,
            subscription_name: subscription.to_string(),
            amount,
            account_number: "A1".to_string(),
            contract_number: "C1".to_string(),
            start_date: "2020-01-01".to_string(),
            end_date: "2021-01-01".to_string(),
            virtual_class: class,
            hypervisor: "NA".to_string(),
            facts: NormalizedFacts::default(),
        }
    }

    #[test]
    fn test_accumulate_creates_and_adds() {
        let mut summary = SubscriptionSummary::new();
        summary.accumulate(&row("RHEL Server", VirtualClass::NotApplicable, 2));
        summary.accumulate(&row("RHEL Server", VirtualClass::NotApplicable, 3));
        summary.accumulate(&row("RHEL Server", VirtualClass::Guest, 1));

        assert_eq!(summary.len(), 1);
        assert_eq!(summary.total_for("RHEL Server", "NA"), Some(5));
        assert_eq!(summary.total_for("RHEL Server", "virtual"), Some(1));
        assert_eq!(summary.total_for("RHEL Server", "hypervisor"), None);
    }

    #[test]
    fn test_accumulation_order_does_not_matter() {
        let r1 = row("RHEL Server", VirtualClass::Hypervisor, 2);
        let r2 = row("RHEL Server", VirtualClass::Hypervisor, 7);
        let r3 = row("Smart Management", VirtualClass::Reported("kvm".to_string()), 1);

        let mut forward = SubscriptionSummary::new();
        for r in [&r1, &r2, &r3] {
            forward.accumulate(r);
        }

        let mut backward = SubscriptionSummary::new();
        for r in [&r3, &r2, &r1] {
            backward.accumulate(r);
        }

        assert_eq!(forward, backward);
    }

    #[test]
    fn test_merge_is_associative() {
        let mut a = SubscriptionSummary::new();
        a.add("RHEL", "NA", 1);
        let mut b = SubscriptionSummary::new();
        b.add("RHEL", "NA", 2);
        b.add("JBoss", "virtual", 4);
        let mut c = SubscriptionSummary::new();
        c.add("JBoss", "virtual", 8);

        let mut left = a.clone();
        left.merge(&b);
        left.merge(&c);

        let mut bc = b.clone();
        bc.merge(&c);
        let mut right = a.clone();
        right.merge(&bc);

        assert_eq!(left, right);
        assert_eq!(left.total_for("RHEL", "NA"), Some(3));
        assert_eq!(left.total_for("JBoss", "virtual"), Some(12));
    }

    #[test]
    fn test_incompliant_insert_is_idempotent() {
        let mut set = IncompliantSet::default();
        assert!(set.insert("u1", "host1"));
        assert!(!set.insert("u1", "host1"));

        assert_eq!(set.len(), 1);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![("u1", "host1")]);
    }
}
