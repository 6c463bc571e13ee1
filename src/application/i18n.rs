//! UI string tables for English, Spanish and French
//!
//! Selecting a language only changes displayed text, never the tree.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
    Fr,
}

impl Language {
    pub const FALLBACK: Language = Language::En;

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Fr => "fr",
        }
    }

    /// Resolve a language code such as `fr` or `es-MX`; unknown codes fall
    /// back to English.
    pub fn from_code(code: &str) -> Language {
        code.parse().unwrap_or(Self::FALLBACK)
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let primary = s
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "en" => Ok(Language::En),
            "es" => Ok(Language::Es),
            "fr" => Ok(Language::Fr),
            _ => Err(format!("unsupported language: {s}")),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextKey {
    /// Contains the `{{name}}` placeholder
    FamilyTreeTitle,
    SearchPlaceholder,
    ResetView,
    ExportPdf,
    FamilyStats,
    TotalMembers,
    Generations,
    AverageWealth,
    NoResults,
}

impl TextKey {
    pub const ALL: [TextKey; 9] = [
        TextKey::FamilyTreeTitle,
        TextKey::SearchPlaceholder,
        TextKey::ResetView,
        TextKey::ExportPdf,
        TextKey::FamilyStats,
        TextKey::TotalMembers,
        TextKey::Generations,
        TextKey::AverageWealth,
        TextKey::NoResults,
    ];

    /// Key name as used in translation resources.
    pub fn name(self) -> &'static str {
        match self {
            TextKey::FamilyTreeTitle => "familyTreeTitle",
            TextKey::SearchPlaceholder => "searchPlaceholder",
            TextKey::ResetView => "resetView",
            TextKey::ExportPdf => "exportPDF",
            TextKey::FamilyStats => "familyStats",
            TextKey::TotalMembers => "totalMembers",
            TextKey::Generations => "generations",
            TextKey::AverageWealth => "averageWealth",
            TextKey::NoResults => "noResults",
        }
    }
}

pub fn text(lang: Language, key: TextKey) -> &'static str {
    use TextKey::*;
    match (lang, key) {
        (Language::En, FamilyTreeTitle) => "{{name}} Family Tree",
        (Language::En, SearchPlaceholder) => "Search family members...",
        (Language::En, ResetView) => "Reset View",
        (Language::En, ExportPdf) => "Export to PDF",
        (Language::En, FamilyStats) => "Family Statistics",
        (Language::En, TotalMembers) => "Total Members",
        (Language::En, Generations) => "Generations",
        (Language::En, AverageWealth) => "Average Wealth",
        (Language::En, NoResults) => "No results found",

        (Language::Es, FamilyTreeTitle) => "Árbol Genealógico de {{name}}",
        (Language::Es, SearchPlaceholder) => "Buscar miembros de la familia...",
        (Language::Es, ResetView) => "Reiniciar Vista",
        (Language::Es, ExportPdf) => "Exportar a PDF",
        (Language::Es, FamilyStats) => "Estadísticas Familiares",
        (Language::Es, TotalMembers) => "Miembros Totales",
        (Language::Es, Generations) => "Generaciones",
        (Language::Es, AverageWealth) => "Riqueza Promedio",
        (Language::Es, NoResults) => "No se encontraron resultados",

        (Language::Fr, FamilyTreeTitle) => "Arbre Généalogique {{name}}",
        (Language::Fr, SearchPlaceholder) => "Rechercher des membres de la famille...",
        (Language::Fr, ResetView) => "Réinitialiser la Vue",
        (Language::Fr, ExportPdf) => "Exporter en PDF",
        (Language::Fr, FamilyStats) => "Statistiques Familiales",
        (Language::Fr, TotalMembers) => "Nombre Total de Membres",
        (Language::Fr, Generations) => "Générations",
        (Language::Fr, AverageWealth) => "Richesse Moyenne",
        (Language::Fr, NoResults) => "Aucun résultat trouvé",
    }
}

/// Title with the family name filled in.
pub fn family_tree_title(lang: Language, family_name: &str) -> String {
    text(lang, TextKey::FamilyTreeTitle).replace("{{name}}", family_name)
}
