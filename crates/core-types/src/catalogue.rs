use serde::{Deserialize, Serialize};

/// A named group of budget indicators with the colour the dashboard draws it in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorCategory {
    pub name: String,
    pub indicators: Vec<String>,
    pub color: String,
}

impl IndicatorCategory {
    fn new(name: &str, indicators: &[&str], color: &str) -> Self {
        Self {
            name: name.to_string(),
            indicators: indicators.iter().map(|s| s.to_string()).collect(),
            color: color.to_string(),
        }
    }
}

/// The built-in catalogue of state budget indicators.
pub fn indicator_categories() -> Vec<IndicatorCategory> {
    vec![
        IndicatorCategory::new(
            "Prihodi",
            &[
                "Ukupni Prihodi, Euro",
                "Porezi, Euro",
                "Doprinosi, Euro",
                "Carine, Euro",
                "Takse, Euro",
                "Ostali prihodi, Euro",
                "Grantovi i transferi, Euro",
            ],
            "#10b981",
        ),
        IndicatorCategory::new(
            "Porezi - Detaljno",
            &[
                "Porez na lična primanja, Euro",
                "Porez na dobit preduzeća, Euro",
                "Porez na dodatu vrijednost, Euro",
                "Akcize, Euro",
                "Porez na međunarodnu trgovinu i transakcije, Euro",
                "Ostali republikanski porezi, Euro",
            ],
            "#3b82f6",
        ),
        IndicatorCategory::new(
            "Rashodi",
            &[
                "Ukupni Rashodi, Euro",
                "Tekući rashodi, Euro",
                "Kapitalni rashodi, Euro",
                "Transferi za socijalno osiguranje, Euro",
            ],
            "#ef4444",
        ),
        IndicatorCategory::new(
            "Rashodi - Detaljno",
            &[
                "Bruto plate i doprinosi, Euro",
                "Rashodi za usluge, Euro",
                "Rashodi za materijal, Euro",
                "Tekuće održavanje, Euro",
                "Kamata, Euro",
                "Subvencije, Euro",
            ],
            "#f59e0b",
        ),
        IndicatorCategory::new(
            "Bilans i Finansiranje",
            &[
                "Suficit / deficit, Euro",
                "Primarni bilans, Euro",
                "Finansiranje, Euro",
                "Potrebe za finansiranjem, Euro",
            ],
            "#8b5cf6",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_has_unique_indicators() {
        let categories = indicator_categories();
        assert_eq!(categories.len(), 5);

        let mut all: Vec<&String> = categories.iter().flat_map(|c| &c.indicators).collect();
        let total = all.len();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), total);
    }
}
