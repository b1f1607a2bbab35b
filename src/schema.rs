//! Declarative column discovery for sheets whose headers drift from year to year.
//!
//! A [`SchemaTable`] lists one [`RoleRule`] per semantic role. Rules are
//! evaluated in table order against canonical headers; each rule takes the
//! first header (left to right) that matches it and has not already been
//! taken by an earlier rule. A header matching two roles goes to whichever
//! role has no other option.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Semantic meaning of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Count,
    Station,
    Borough,
    Line,
    Category,
    Frequency,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Count => "count",
            Role::Station => "station",
            Role::Borough => "borough",
            Role::Line => "line",
            Role::Category => "category",
            Role::Frequency => "frequency",
        };
        f.write_str(name)
    }
}

/// How a canonical header is tested against a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleMatcher {
    /// Header contains any of these substrings.
    Contains(Vec<String>),
    /// Header equals this string.
    Exact(String),
}

impl RoleMatcher {
    pub fn matches(&self, header: &str) -> bool {
        match self {
            RoleMatcher::Contains(needles) => needles.iter().any(|n| header.contains(n.as_str())),
            RoleMatcher::Exact(name) => header == name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRule {
    pub role: Role,
    pub matcher: RoleMatcher,
    pub required: bool,
}

impl RoleRule {
    fn contains(role: Role, needles: &[&str], required: bool) -> Self {
        Self {
            role,
            matcher: RoleMatcher::Contains(needles.iter().map(|n| n.to_string()).collect()),
            required,
        }
    }

    fn exact(role: Role, name: &str, required: bool) -> Self {
        Self {
            role,
            matcher: RoleMatcher::Exact(name.to_string()),
            required,
        }
    }
}

/// Column index for each role found on a sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    columns: HashMap<Role, usize>,
}

impl ColumnMapping {
    pub fn get(&self, role: Role) -> Option<usize> {
        self.columns.get(&role).copied()
    }

    pub fn contains(&self, role: Role) -> bool {
        self.columns.contains_key(&role)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaTable {
    pub rules: Vec<RoleRule>,
}

impl Default for SchemaTable {
    fn default() -> Self {
        Self::year_sheet()
    }
}

impl SchemaTable {
    pub fn new(rules: Vec<RoleRule>) -> Self {
        Self { rules }
    }

    /// Roles for the per-year incident sheets.
    ///
    /// | Role    | Match                          | Required |
    /// |---------|--------------------------------|----------|
    /// | count   | contains `robo` or `reporte`   | yes      |
    /// | station | contains `estacion`            | yes      |
    /// | borough | equals `alcaldia`              | no       |
    /// | line    | equals `linea`                 | no       |
    pub fn year_sheet() -> Self {
        Self::new(vec![
            RoleRule::contains(Role::Count, &["robo", "reporte"], true),
            RoleRule::contains(Role::Station, &["estacion"], true),
            RoleRule::exact(Role::Borough, "alcaldia", false),
            RoleRule::exact(Role::Line, "linea", false),
        ])
    }

    /// Roles for the categorical gender sheet.
    pub fn gender_sheet() -> Self {
        Self::new(vec![
            RoleRule::exact(Role::Category, "genero", true),
            RoleRule::exact(Role::Frequency, "frecuencia", true),
        ])
    }

    /// Maps canonical headers to roles.
    ///
    /// Each rule takes the first untaken header that matches it. When every
    /// matching header is already taken, an earlier rule is moved to another
    /// header it also matches so both can resolve. If that is impossible the
    /// rule shares the first header it matches.
    ///
    /// # Errors
    ///
    /// Returns every required role that no header satisfied.
    pub fn map_headers(&self, headers: &[String]) -> Result<ColumnMapping, Vec<Role>> {
        let candidates: Vec<Vec<usize>> = self
            .rules
            .iter()
            .map(|rule| {
                headers
                    .iter()
                    .enumerate()
                    .filter(|(_, header)| rule.matcher.matches(header))
                    .map(|(idx, _)| idx)
                    .collect()
            })
            .collect();

        // owner[header] = index of the rule holding it
        let mut owner: Vec<Option<usize>> = vec![None; headers.len()];
        let mut shared = Vec::new();
        let mut missing = Vec::new();

        for (rule_idx, rule) in self.rules.iter().enumerate() {
            let Some(&first) = candidates[rule_idx].first() else {
                if rule.required {
                    missing.push(rule.role);
                }
                continue;
            };

            let mut visited = vec![false; headers.len()];
            if !claim(rule_idx, &candidates, &mut owner, &mut visited) {
                shared.push((rule.role, first));
            }
        }

        if !missing.is_empty() {
            return Err(missing);
        }

        let mut mapping = ColumnMapping::default();
        for (idx, holder) in owner.iter().enumerate() {
            if let Some(rule_idx) = holder {
                mapping.columns.insert(self.rules[*rule_idx].role, idx);
            }
        }
        for (role, idx) in shared {
            mapping.columns.entry(role).or_insert(idx);
        }
        Ok(mapping)
    }
}

/// Gives `rule` a header of its own, moving earlier holders along when they
/// have somewhere else to go. Returns false when no such arrangement exists.
fn claim(
    rule: usize,
    candidates: &[Vec<usize>],
    owner: &mut [Option<usize>],
    visited: &mut [bool],
) -> bool {
    if let Some(&free) = candidates[rule].iter().find(|&&idx| owner[idx].is_none()) {
        owner[free] = Some(rule);
        return true;
    }

    for &idx in &candidates[rule] {
        if visited[idx] {
            continue;
        }
        visited[idx] = true;

        let Some(holder) = owner[idx] else {
            continue;
        };
        if claim(holder, candidates, owner, visited) {
            owner[idx] = Some(rule);
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_year_sheet_maps_all_roles() {
        let table = SchemaTable::year_sheet();
        let mapping = table
            .map_headers(&headers(&["linea", "estacion", "alcaldia", "numero_de_robos"]))
            .unwrap();

        assert_eq!(mapping.get(Role::Count), Some(3));
        assert_eq!(mapping.get(Role::Station), Some(1));
        assert_eq!(mapping.get(Role::Borough), Some(2));
        assert_eq!(mapping.get(Role::Line), Some(0));
    }

    #[test]
    fn test_count_matches_reporte() {
        let table = SchemaTable::year_sheet();
        let mapping = table
            .map_headers(&headers(&["nombre_estacion", "total_reportes"]))
            .unwrap();

        assert_eq!(mapping.get(Role::Count), Some(1));
        assert_eq!(mapping.get(Role::Station), Some(0));
    }

    #[test]
    fn test_first_match_wins() {
        let table = SchemaTable::year_sheet();
        let mapping = table
            .map_headers(&headers(&["estacion", "robos_2020", "reportes_2020"]))
            .unwrap();

        assert_eq!(mapping.get(Role::Count), Some(1));
    }

    #[test]
    fn test_header_not_claimed_twice() {
        let table = SchemaTable::year_sheet();
        let mapping = table
            .map_headers(&headers(&["robos_por_estacion", "estacion"]))
            .unwrap();

        assert_eq!(mapping.get(Role::Count), Some(0));
        assert_eq!(mapping.get(Role::Station), Some(1));
    }

    #[test]
    fn test_shared_keyword_header_goes_to_station() {
        let table = SchemaTable::year_sheet();
        let mapping = table
            .map_headers(&headers(&["estacion_con_robos", "robos", "alcaldia"]))
            .unwrap();

        assert_eq!(mapping.get(Role::Station), Some(0));
        assert_eq!(mapping.get(Role::Count), Some(1));
        assert_eq!(mapping.get(Role::Borough), Some(2));
    }

    #[test]
    fn test_single_header_serves_both_roles() {
        let table = SchemaTable::year_sheet();
        let mapping = table.map_headers(&headers(&["estacion_robos"])).unwrap();

        assert_eq!(mapping.get(Role::Count), Some(0));
        assert_eq!(mapping.get(Role::Station), Some(0));
    }

    #[test]
    fn test_optional_roles_may_be_absent() {
        let table = SchemaTable::year_sheet();
        let mapping = table.map_headers(&headers(&["estacion", "robos"])).unwrap();

        assert!(!mapping.contains(Role::Borough));
        assert!(!mapping.contains(Role::Line));
    }

    #[test]
    fn test_borough_requires_exact_header() {
        let table = SchemaTable::year_sheet();
        let mapping = table
            .map_headers(&headers(&["estacion", "robos", "alcaldia_2020"]))
            .unwrap();

        assert!(!mapping.contains(Role::Borough));
    }

    #[test]
    fn test_missing_required_roles_reported() {
        let table = SchemaTable::year_sheet();
        let missing = table
            .map_headers(&headers(&["alcaldia", "linea"]))
            .unwrap_err();

        assert_eq!(missing, vec![Role::Count, Role::Station]);
    }

    #[test]
    fn test_gender_sheet_exact_headers() {
        let table = SchemaTable::gender_sheet();
        let mapping = table.map_headers(&headers(&["frecuencia", "genero"])).unwrap();
        assert_eq!(mapping.get(Role::Category), Some(1));
        assert_eq!(mapping.get(Role::Frequency), Some(0));

        let missing = table
            .map_headers(&headers(&["genero_victima", "frecuencia"]))
            .unwrap_err();
        assert_eq!(missing, vec![Role::Category]);
    }

    #[test]
    fn test_schema_table_round_trips_through_json() {
        let json = serde_json::to_string(&SchemaTable::year_sheet()).unwrap();
        let parsed: SchemaTable = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, SchemaTable::year_sheet());
    }
}
