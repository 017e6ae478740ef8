//! Medienkatalog: Index-Datei plus Chunk-weiser Dateizugriff
//!
//! Der Index ist eine TOML-Datei mit `[[medien]]`-Eintraegen. Die
//! eigentlichen Mediendateien liegen in einem Basisverzeichnis und
//! werden nie komplett in den Speicher geladen; jeder Zugriff liest
//! genau einen Chunk.

use std::collections::BTreeMap;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use crate::error::{KatalogFehler, KatalogResult};

/// Feste Chunk-Groesse des Auslieferungsprotokolls in Bytes
pub const CHUNK_GROESSE: u64 = 4096;

/// Ein Eintrag im Katalog-Index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaEintrag {
    /// Eindeutige Katalog-ID
    pub id: String,
    /// Anzeigename
    pub name: String,
    #[serde(default)]
    pub album: String,
    #[serde(default)]
    pub beschreibung: String,
    /// Abspieldauer in Sekunden; wird pro Auslieferung abgebucht
    pub dauer_secs: u64,
    /// Dateiname relativ zum Basisverzeichnis
    pub datei: String,
    /// Dateigroesse in Bytes, beim Laden aus dem Dateisystem ermittelt
    #[serde(skip)]
    pub dateigroesse: u64,
}

impl MediaEintrag {
    /// Anzahl Chunks dieses Mediums (aufgerundet)
    ///
    /// Eine leere Datei hat null Chunks; jeder Index ist dann ungueltig.
    pub fn chunk_anzahl(&self) -> u64 {
        self.dateigroesse.div_ceil(CHUNK_GROESSE)
    }
}

/// Zeile der Katalogliste, wie sie an Clients geht
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KatalogUebersicht {
    pub id: String,
    pub name: String,
    pub album: String,
    pub beschreibung: String,
    pub dauer_secs: u64,
    pub chunks: u64,
}

#[derive(Debug, Deserialize)]
struct IndexDatei {
    #[serde(default)]
    medien: Vec<MediaEintrag>,
}

/// Der geladene Katalog
///
/// Nach dem Laden unveraenderlich; alle Zugriffe sind read-only und
/// brauchen keine Synchronisation.
#[derive(Debug)]
pub struct Katalog {
    verzeichnis: PathBuf,
    eintraege: BTreeMap<String, MediaEintrag>,
}

impl Katalog {
    /// Laedt den Index und ermittelt die Dateigroessen
    ///
    /// Eintraege, deren Datei fehlt, sind ein harter Fehler; ein
    /// Katalog mit Phantom-Eintraegen geht nie in Betrieb.
    pub async fn laden(verzeichnis: &Path, index_datei: &Path) -> KatalogResult<Self> {
        let inhalt = tokio::fs::read_to_string(index_datei).await?;
        let index: IndexDatei = toml::from_str(&inhalt)?;

        let mut eintraege = BTreeMap::new();
        for mut eintrag in index.medien {
            let pfad = verzeichnis.join(&eintrag.datei);
            let meta = tokio::fs::metadata(&pfad).await?;
            eintrag.dateigroesse = meta.len();
            tracing::debug!(
                id = %eintrag.id,
                datei = %pfad.display(),
                groesse = eintrag.dateigroesse,
                chunks = eintrag.chunk_anzahl(),
                "Katalog-Eintrag geladen"
            );
            eintraege.insert(eintrag.id.clone(), eintrag);
        }

        tracing::info!(anzahl = eintraege.len(), "Medienkatalog geladen");
        Ok(Self {
            verzeichnis: verzeichnis.to_path_buf(),
            eintraege,
        })
    }

    /// Uebersicht aller Eintraege fuer die Katalogliste
    pub fn uebersicht(&self) -> Vec<KatalogUebersicht> {
        self.eintraege
            .values()
            .map(|e| KatalogUebersicht {
                id: e.id.clone(),
                name: e.name.clone(),
                album: e.album.clone(),
                beschreibung: e.beschreibung.clone(),
                dauer_secs: e.dauer_secs,
                chunks: e.chunk_anzahl(),
            })
            .collect()
    }

    /// Einzelnen Eintrag nachschlagen
    pub fn eintrag(&self, id: &str) -> KatalogResult<&MediaEintrag> {
        self.eintraege
            .get(id)
            .ok_or_else(|| KatalogFehler::MedienNichtGefunden(id.to_string()))
    }

    /// Liest genau einen Chunk eines Mediums
    ///
    /// Der letzte Chunk darf kuerzer als `CHUNK_GROESSE` sein. Indizes
    /// ab `chunk_anzahl()` werden abgelehnt, ebenso jeder Index einer
    /// leeren Datei.
    pub async fn chunk_lesen(&self, id: &str, index: u64) -> KatalogResult<Vec<u8>> {
        let eintrag = self.eintrag(id)?;
        let anzahl = eintrag.chunk_anzahl();
        if index >= anzahl {
            return Err(KatalogFehler::UngueltigerChunk {
                medium: id.to_string(),
                index,
                anzahl,
            });
        }

        let pfad = self.verzeichnis.join(&eintrag.datei);
        let mut datei = File::open(&pfad).await?;
        datei.seek(SeekFrom::Start(index * CHUNK_GROESSE)).await?;

        let mut puffer = Vec::with_capacity(CHUNK_GROESSE as usize);
        datei
            .take(CHUNK_GROESSE)
            .read_to_end(&mut puffer)
            .await?;
        Ok(puffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    // 3 407 202 Bytes ergeben 832 Chunks, der letzte mit 3426 Bytes
    const TEST_GROESSE: usize = 3_407_202;

    fn test_katalog_anlegen(dir: &Path) -> PathBuf {
        let daten: Vec<u8> = (0..TEST_GROESSE).map(|i| (i % 251) as u8).collect();
        std::fs::write(dir.join("album.mp3"), &daten).unwrap();
        std::fs::write(dir.join("leer.mp3"), b"").unwrap();

        let index = dir.join("katalog.toml");
        let mut f = std::fs::File::create(&index).unwrap();
        writeln!(
            f,
            r#"
[[medien]]
id = "m1"
name = "Testalbum"
album = "Kassette"
beschreibung = "Referenzmedium"
dauer_secs = 213
datei = "album.mp3"

[[medien]]
id = "m2"
name = "Leeres Medium"
dauer_secs = 1
datei = "leer.mp3"
"#
        )
        .unwrap();
        index
    }

    #[tokio::test]
    async fn laden_und_uebersicht() {
        let dir = tempfile::tempdir().unwrap();
        let index = test_katalog_anlegen(dir.path());
        let katalog = Katalog::laden(dir.path(), &index).await.unwrap();

        let uebersicht = katalog.uebersicht();
        assert_eq!(uebersicht.len(), 2);
        let m1 = uebersicht.iter().find(|e| e.id == "m1").unwrap();
        assert_eq!(m1.chunks, 832);
        assert_eq!(m1.dauer_secs, 213);
    }

    #[tokio::test]
    async fn erster_chunk_hat_volle_groesse() {
        let dir = tempfile::tempdir().unwrap();
        let index = test_katalog_anlegen(dir.path());
        let katalog = Katalog::laden(dir.path(), &index).await.unwrap();

        let chunk = katalog.chunk_lesen("m1", 0).await.unwrap();
        assert_eq!(chunk.len(), CHUNK_GROESSE as usize);
        let erwartet: Vec<u8> = (0..CHUNK_GROESSE as usize).map(|i| (i % 251) as u8).collect();
        assert_eq!(chunk, erwartet);
    }

    #[tokio::test]
    async fn letzter_chunk_ist_kuerzer() {
        let dir = tempfile::tempdir().unwrap();
        let index = test_katalog_anlegen(dir.path());
        let katalog = Katalog::laden(dir.path(), &index).await.unwrap();

        let chunk = katalog.chunk_lesen("m1", 831).await.unwrap();
        assert_eq!(chunk.len(), 3426);
        let start = 831 * CHUNK_GROESSE as usize;
        let erwartet: Vec<u8> = (start..TEST_GROESSE).map(|i| (i % 251) as u8).collect();
        assert_eq!(chunk, erwartet);
    }

    #[tokio::test]
    async fn index_hinter_dateiende_abgelehnt() {
        let dir = tempfile::tempdir().unwrap();
        let index = test_katalog_anlegen(dir.path());
        let katalog = Katalog::laden(dir.path(), &index).await.unwrap();

        let ergebnis = katalog.chunk_lesen("m1", 832).await;
        assert!(matches!(
            ergebnis,
            Err(KatalogFehler::UngueltigerChunk { index: 832, anzahl: 832, .. })
        ));
    }

    #[tokio::test]
    async fn leere_datei_hat_keine_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let index = test_katalog_anlegen(dir.path());
        let katalog = Katalog::laden(dir.path(), &index).await.unwrap();

        assert_eq!(katalog.eintrag("m2").unwrap().chunk_anzahl(), 0);
        let ergebnis = katalog.chunk_lesen("m2", 0).await;
        assert!(matches!(
            ergebnis,
            Err(KatalogFehler::UngueltigerChunk { anzahl: 0, .. })
        ));
    }

    #[tokio::test]
    async fn unbekanntes_medium() {
        let dir = tempfile::tempdir().unwrap();
        let index = test_katalog_anlegen(dir.path());
        let katalog = Katalog::laden(dir.path(), &index).await.unwrap();

        let ergebnis = katalog.chunk_lesen("gibt-es-nicht", 0).await;
        assert!(matches!(ergebnis, Err(KatalogFehler::MedienNichtGefunden(_))));
    }

    #[tokio::test]
    async fn fehlende_datei_ist_ladefehler() {
        let dir = tempfile::tempdir().unwrap();
        let index = dir.path().join("katalog.toml");
        std::fs::write(
            &index,
            r#"
[[medien]]
id = "kaputt"
name = "Fehlt"
dauer_secs = 10
datei = "nicht-da.mp3"
"#,
        )
        .unwrap();

        let ergebnis = Katalog::laden(dir.path(), &index).await;
        assert!(matches!(ergebnis, Err(KatalogFehler::Io(_))));
    }
}
