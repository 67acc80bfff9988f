use super::super::domain::{Component, ComponentBreakdown};

/// Sums gathered in a single pass over the component ledger.
pub(crate) struct ContentSignals {
    pub usmca_content: f64,
    pub non_usmca_content: f64,
    pub declared_total: f64,
    pub breakdown: Vec<ComponentBreakdown>,
}

pub(crate) fn tally_components(components: &[Component]) -> ContentSignals {
    let mut usmca_content = 0.0;
    let mut non_usmca_content = 0.0;
    let mut breakdown = Vec::with_capacity(components.len());

    for component in components {
        let member = component.usmca_member();
        if member.is_some() {
            usmca_content += component.value_percentage;
        } else {
            non_usmca_content += component.value_percentage;
        }

        breakdown.push(ComponentBreakdown {
            description: component.description.clone(),
            origin_country: component.origin_country.clone(),
            value_percentage: component.value_percentage,
            usmca_member: member,
            is_usmca_member: member.is_some(),
        });
    }

    ContentSignals {
        usmca_content,
        non_usmca_content,
        declared_total: usmca_content + non_usmca_content,
        breakdown,
    }
}
