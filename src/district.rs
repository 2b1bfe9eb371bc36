/// A web domain the instruction asks the model to prioritize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedSource {
    pub domain: &'static str,
    pub label: &'static str,
}

/// The district being checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct District {
    pub name: &'static str,
    pub locale: &'static str,
    pub trusted_sources: &'static [TrustedSource],
    pub facebook_query: &'static str,
}

const DELAWARE_CITY_SOURCES: &[TrustedSource] = &[
    TrustedSource {
        domain: "dcs.k12.oh.us",
        label: "District site",
    },
    TrustedSource {
        domain: "10tv.com",
        label: "10TV",
    },
    TrustedSource {
        domain: "nbc4i.com",
        label: "NBC4",
    },
    TrustedSource {
        domain: "abc6onyourside.com",
        label: "ABC6",
    },
];

pub const DELAWARE_CITY_SCHOOLS: District = District {
    name: "Delaware City Schools",
    locale: "Delaware, Ohio",
    trusted_sources: DELAWARE_CITY_SOURCES,
    facebook_query: "Delaware City Schools Facebook",
};

impl District {
    pub fn domains(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.trusted_sources.iter().map(|s| s.domain)
    }

    /// Search queries suggested to the model, one per line.
    pub fn search_queries(&self, short_date: &str, date_with_year: &str) -> Vec<String> {
        let mut queries = vec![
            format!("\"{} 2 hour delay {date_with_year}\"", self.name),
            format!("\"{} status {short_date}\"", self.name),
        ];
        for (i, domain) in self.domains().enumerate() {
            if i == 0 {
                queries.push(format!("\"site:{domain}\""));
            } else {
                queries.push(format!("\"site:{domain} {} closings\"", self.name));
            }
        }
        queries.push(format!("\"{}\"", self.facebook_query));
        queries
    }

    /// Human-readable list of news outlets, e.g. `10TV, NBC4, ABC6`.
    pub fn outlet_labels(&self) -> String {
        self.trusted_sources
            .iter()
            .skip(1)
            .map(|s| s.label)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
