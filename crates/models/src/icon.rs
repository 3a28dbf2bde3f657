use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Icons a service card can show. Each maps to a bundled asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceIcon {
    #[default]
    BrainCircuit,
    Bot,
    Cloud,
    Database,
    LineChart,
    ShieldCheck,
    Code,
    Sparkles,
    Workflow,
    MessageSquare,
}

impl ServiceIcon {
    pub const ALL: [ServiceIcon; 10] = [
        ServiceIcon::BrainCircuit,
        ServiceIcon::Bot,
        ServiceIcon::Cloud,
        ServiceIcon::Database,
        ServiceIcon::LineChart,
        ServiceIcon::ShieldCheck,
        ServiceIcon::Code,
        ServiceIcon::Sparkles,
        ServiceIcon::Workflow,
        ServiceIcon::MessageSquare,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ServiceIcon::BrainCircuit => "brain-circuit",
            ServiceIcon::Bot => "bot",
            ServiceIcon::Cloud => "cloud",
            ServiceIcon::Database => "database",
            ServiceIcon::LineChart => "line-chart",
            ServiceIcon::ShieldCheck => "shield-check",
            ServiceIcon::Code => "code",
            ServiceIcon::Sparkles => "sparkles",
            ServiceIcon::Workflow => "workflow",
            ServiceIcon::MessageSquare => "message-square",
        }
    }

    pub fn asset(self) -> &'static str {
        match self {
            ServiceIcon::BrainCircuit => "/icons/brain-circuit.svg",
            ServiceIcon::Bot => "/icons/bot.svg",
            ServiceIcon::Cloud => "/icons/cloud.svg",
            ServiceIcon::Database => "/icons/database.svg",
            ServiceIcon::LineChart => "/icons/line-chart.svg",
            ServiceIcon::ShieldCheck => "/icons/shield-check.svg",
            ServiceIcon::Code => "/icons/code.svg",
            ServiceIcon::Sparkles => "/icons/sparkles.svg",
            ServiceIcon::Workflow => "/icons/workflow.svg",
            ServiceIcon::MessageSquare => "/icons/message-square.svg",
        }
    }
}

impl fmt::Display for ServiceIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl FromStr for ServiceIcon {
    type Err = ModelError;

    /// Accepts kebab-case as well as the PascalCase names older forms posted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s.trim().chars().filter(|c| c.is_ascii_alphanumeric()).collect::<String>().to_ascii_lowercase();
        ServiceIcon::ALL
            .into_iter()
            .find(|icon| icon.name().replace('-', "") == normalized)
            .ok_or_else(|| ModelError::UnknownVariant { kind: "icon", value: s.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_kebab_and_pascal_case() {
        assert_eq!("brain-circuit".parse::<ServiceIcon>().unwrap(), ServiceIcon::BrainCircuit);
        assert_eq!("ShieldCheck".parse::<ServiceIcon>().unwrap(), ServiceIcon::ShieldCheck);
        assert!("rocket".parse::<ServiceIcon>().is_err());
    }

    #[test]
    fn every_icon_has_an_asset() {
        for icon in ServiceIcon::ALL {
            assert!(icon.asset().ends_with(&format!("{}.svg", icon.name())));
        }
    }
}
