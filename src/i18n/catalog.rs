//! Built-in message catalogs.

use super::{render, Localizer, MessageArgs};
use serde::{Deserialize, Serialize};

/// Languages with a built-in catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    De,
}

impl Language {
    /// Parse a language code such as `en`, `de` or `de-DE`
    pub fn from_code(code: &str) -> Option<Self> {
        let primary = code.split(['-', '_']).next().unwrap_or_default();
        match primary.to_lowercase().as_str() {
            "en" => Some(Language::En),
            "de" => Some(Language::De),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::De => "de",
        }
    }
}

const ENGLISH: &[(&str, &str)] = &[
    ("ScanningForFiles", "Scanning {Root} for image files"),
    ("ErrorAccessingPath", "Skipping {FilePath}: {Error}"),
    ("PotentialDuplicateGroupsFound", "Found {Count} groups of files with identical size"),
    ("HashingStarted", "Hashing {Count} files with {Workers} workers"),
    ("PHashError", "Could not hash {Path}: {Error}"),
    ("HashingFinished", "Hashed {Count} files ({Failed} failed)"),
    ("GroupingDuplicatesStarted", "Comparing {Count} fingerprints"),
    ("HashCompareError", "Could not compare {File1} with {File2}: {Error}"),
    ("GroupingDuplicatesFinished", "Found {Count} duplicate groups"),
    ("DuplicateGroupFound", "Keeping {ToKeep}, {ToRemoveCount} duplicate(s) to remove"),
    ("SummaryNoDuplicates", "No duplicates found"),
    ("SummaryDuplicatesFound", "{Groups} duplicate groups, {Files} files removed"),
    ("DryRunWouldMoveFile", "[DRY RUN] Would remove {Source} (duplicate of {Destination})"),
    ("MovingFile", "Moving {From} to {To}"),
    ("MoveToTrashSetup", "Duplicates will be moved to {Dir}"),
    ("ActionStrategyError", "Could not prepare the action: {Error}"),
    ("ActionFailed", "Action failed (keep: {Keep}, remove: {Remove}): {Error}"),
    ("TeardownFailed", "Cleanup after the run failed: {Error}"),
    ("RunCancelled", "Run cancelled"),
];

const GERMAN: &[(&str, &str)] = &[
    ("ScanningForFiles", "Durchsuche {Root} nach Bilddateien"),
    ("ErrorAccessingPath", "Überspringe {FilePath}: {Error}"),
    ("PotentialDuplicateGroupsFound", "{Count} Gruppen von Dateien gleicher Größe gefunden"),
    ("HashingStarted", "Berechne Hashes für {Count} Dateien mit {Workers} Workern"),
    ("PHashError", "Hash für {Path} fehlgeschlagen: {Error}"),
    ("HashingFinished", "{Count} Dateien gehasht ({Failed} fehlgeschlagen)"),
    ("GroupingDuplicatesStarted", "Vergleiche {Count} Fingerabdrücke"),
    ("HashCompareError", "Vergleich von {File1} mit {File2} fehlgeschlagen: {Error}"),
    ("GroupingDuplicatesFinished", "{Count} Duplikatgruppen gefunden"),
    ("DuplicateGroupFound", "Behalte {ToKeep}, {ToRemoveCount} Duplikat(e) zu entfernen"),
    ("SummaryNoDuplicates", "Keine Duplikate gefunden"),
    ("SummaryDuplicatesFound", "{Groups} Duplikatgruppen, {Files} Dateien entfernt"),
    ("DryRunWouldMoveFile", "[TESTLAUF] Würde {Source} entfernen (Duplikat von {Destination})"),
    ("MovingFile", "Verschiebe {From} nach {To}"),
    ("MoveToTrashSetup", "Duplikate werden nach {Dir} verschoben"),
    ("ActionStrategyError", "Aktion konnte nicht vorbereitet werden: {Error}"),
    ("ActionFailed", "Aktion fehlgeschlagen (behalten: {Keep}, entfernen: {Remove}): {Error}"),
    ("TeardownFailed", "Aufräumen nach dem Lauf fehlgeschlagen: {Error}"),
    ("RunCancelled", "Lauf abgebrochen"),
];

/// Static message catalog
#[derive(Debug, Clone, Copy, Default)]
pub struct Catalog {
    language: Language,
}

impl Catalog {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    /// Catalog for a language code, falling back to English
    pub fn for_language(code: &str) -> Self {
        Self::new(Language::from_code(code).unwrap_or_default())
    }

    fn lookup(table: &[(&str, &'static str)], id: &str) -> Option<&'static str> {
        table
            .iter()
            .find(|(key, _)| *key == id)
            .map(|(_, template)| *template)
    }

    fn template(&self, id: &str) -> Option<&'static str> {
        let table = match self.language {
            Language::En => ENGLISH,
            Language::De => GERMAN,
        };
        Self::lookup(table, id).or_else(|| Self::lookup(ENGLISH, id))
    }
}

impl Localizer for Catalog {
    fn translate(&self, id: &str, args: &MessageArgs) -> String {
        match self.template(id) {
            Some(template) => render(template, args),
            None => id.to_string(),
        }
    }

    fn language(&self) -> &str {
        self.language.code()
    }
}
