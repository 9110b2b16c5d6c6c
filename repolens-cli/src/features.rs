//! Feature capability map
//!
//! The presentation layer's single answer to "what can this build do".
//! Actions that exist in the product vision but are not wired up yet are
//! listed here instead of being stubbed inline.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityStatus {
    Active,
    Beta,
    ComingSoon,
}

impl CapabilityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityStatus::Active => "active",
            CapabilityStatus::Beta => "beta",
            CapabilityStatus::ComingSoon => "coming soon",
        }
    }
}

impl fmt::Display for CapabilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct Capability {
    pub name: &'static str,
    pub description: &'static str,
    pub status: CapabilityStatus,
}

const CAPABILITIES: &[Capability] = &[
    Capability {
        name: "Repository analyzer",
        description: "Submit a GitHub URL and get structure, tech stack, and complexity",
        status: CapabilityStatus::Active,
    },
    Capability {
        name: "Codebase chat",
        description: "Ask questions about the analyzed codebase",
        status: CapabilityStatus::Active,
    },
    Capability {
        name: "Learning path generator",
        description: "Personalized roadmap based on repository complexity",
        status: CapabilityStatus::ComingSoon,
    },
    Capability {
        name: "Smart PR reviews",
        description: "Pull request reviews with educational explanations",
        status: CapabilityStatus::ComingSoon,
    },
    Capability {
        name: "Code pattern extractor",
        description: "Identifies common patterns, anti-patterns, and best practices",
        status: CapabilityStatus::Beta,
    },
    Capability {
        name: "Practice challenges",
        description: "Generates coding exercises from real code patterns",
        status: CapabilityStatus::ComingSoon,
    },
];

pub fn capabilities() -> &'static [Capability] {
    CAPABILITIES
}
