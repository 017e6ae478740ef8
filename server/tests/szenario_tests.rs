//! End-to-End-Szenarien auf Dienst-Ebene
//!
//! Spielt den vollen Protokollablauf gegen einen Dienst mit einer
//! realistisch grossen Mediendatei durch: Parameter abholen,
//! registrieren, anmelden, Chunks laden, Guthaben pruefen.

use std::io::Write;
use std::sync::Arc;

use kassette_catalog::{Katalog, KatalogFehler, KatalogUebersicht, CHUNK_GROESSE};
use kassette_crypto::{
    dh, schluesselpaar_erzeugen, Cipher, CipherModus, CipherSuite, DigestAlgorithmus,
    DomainParameters, SecretBytes,
};
use kassette_license::{InMemoryLizenzStore, LizenzFehler, LizenzStore};
use kassette_session::{
    kontext_fuer_chunk, oeffnen, versiegeln, SecureEnvelope, Session, SessionStore,
};
use kassette_server::dienst::{AnmeldeDaten, DienstFehler, MedienDienst};

// 3 407 202 Bytes ergeben 832 Chunks, der letzte mit 3426 Bytes
const MEDIEN_GROESSE: usize = 3_407_202;
const MEDIEN_DAUER: u64 = 213;

fn medien_byte(i: usize) -> u8 {
    (i % 251) as u8
}

struct Testumgebung {
    dienst: Arc<MedienDienst<InMemoryLizenzStore>>,
    lizenzen: Arc<InMemoryLizenzStore>,
    _dir: tempfile::TempDir,
}

async fn testumgebung(guthaben_secs: u64) -> Testumgebung {
    let dir = tempfile::tempdir().unwrap();
    let daten: Vec<u8> = (0..MEDIEN_GROESSE).map(medien_byte).collect();
    std::fs::write(dir.path().join("album.mp3"), &daten).unwrap();
    std::fs::write(dir.path().join("leer.mp3"), b"").unwrap();

    let index = dir.path().join("katalog.toml");
    let mut f = std::fs::File::create(&index).unwrap();
    writeln!(
        f,
        r#"
[[medien]]
id = "album"
name = "Referenzalbum"
album = "Kassette"
dauer_secs = {MEDIEN_DAUER}
datei = "album.mp3"

[[medien]]
id = "leer"
name = "Leeres Medium"
dauer_secs = 1
datei = "leer.mp3"
"#
    )
    .unwrap();

    let params = Arc::new(DomainParameters::standard());
    let sessions = SessionStore::neu(Arc::clone(&params), 900);
    let lizenzen = Arc::new(InMemoryLizenzStore::neu());
    lizenzen
        .anlegen("alice", "geheim", guthaben_secs)
        .await
        .unwrap();
    let katalog = Arc::new(Katalog::laden(dir.path(), &index).await.unwrap());

    Testumgebung {
        dienst: Arc::new(MedienDienst::neu(
            params,
            sessions,
            Arc::clone(&lizenzen),
            katalog,
        )),
        lizenzen,
        _dir: dir,
    }
}

fn suite() -> CipherSuite {
    CipherSuite::neu(Cipher::Aes, DigestAlgorithmus::Sha512, CipherModus::Cbc)
}

/// Spielt die Client-Seite des Handshakes: Parameter ueber die
/// Publikationsform beziehen, Schluesselpaar erzeugen, registrieren
fn client_registrieren(dienst: &MedienDienst<InMemoryLizenzStore>) -> Session {
    let params = DomainParameters::aus_veroeffentlichung(&dienst.parameter()).unwrap();
    let paar = schluesselpaar_erzeugen(&params);

    let registrierung = dienst
        .registrieren(&paar.oeffentlich_bytes(), suite())
        .unwrap();

    let server_pub = dh::peer_schluessel_dekodieren(&registrierung.server_public_key).unwrap();
    let secret = dh::austausch(&params, &paar, &server_pub).unwrap();

    Session::neu(
        registrierung.session_id,
        suite(),
        paar.oeffentlich_bytes(),
        registrierung.server_public_key,
        SecretBytes::new(secret.as_bytes().to_vec()),
    )
}

fn anmelde_envelope(client: &Session, username: &str, password: &str) -> SecureEnvelope {
    let json = serde_json::to_vec(&AnmeldeDaten {
        username: username.into(),
        password: password.into(),
    })
    .unwrap();
    versiegeln(client, &json, None).unwrap()
}

async fn angemeldeter_client(umgebung: &Testumgebung) -> Session {
    let client = client_registrieren(&umgebung.dienst);
    let envelope = anmelde_envelope(&client, "alice", "geheim");
    umgebung
        .dienst
        .authentifizieren(client.id, &envelope)
        .await
        .unwrap();
    client
}

#[tokio::test]
async fn voller_ablauf_mit_erstem_chunk() {
    let umgebung = testumgebung(1000).await;
    let client = angemeldeter_client(&umgebung).await;

    // Katalogliste zeigt beide Medien mit korrekten Chunk-Zahlen
    let envelope = umgebung.dienst.liste(client.id).unwrap();
    let klartext = oeffnen(&client, &envelope, None).unwrap();
    let liste: Vec<KatalogUebersicht> = serde_json::from_slice(&klartext).unwrap();
    let album = liste.iter().find(|e| e.id == "album").unwrap();
    assert_eq!(album.chunks, 832);
    assert_eq!(album.dauer_secs, MEDIEN_DAUER);

    // Chunk 0: volle Groesse, korrekter Inhalt, Dauer einmal abgebucht
    let envelope = umgebung.dienst.download(client.id, "album", 0).await.unwrap();
    let chunk = oeffnen(&client, &envelope, Some(&kontext_fuer_chunk(0))).unwrap();
    assert_eq!(chunk.len(), CHUNK_GROESSE as usize);
    let erwartet: Vec<u8> = (0..CHUNK_GROESSE as usize).map(medien_byte).collect();
    assert_eq!(chunk, erwartet);

    assert_eq!(
        umgebung.lizenzen.guthaben("alice").await.unwrap(),
        1000 - MEDIEN_DAUER
    );
}

#[tokio::test]
async fn letzter_chunk_traegt_den_rest() {
    let umgebung = testumgebung(1000).await;
    let client = angemeldeter_client(&umgebung).await;

    let envelope = umgebung
        .dienst
        .download(client.id, "album", 831)
        .await
        .unwrap();
    let chunk = oeffnen(&client, &envelope, Some(&kontext_fuer_chunk(831))).unwrap();
    assert_eq!(chunk.len(), 3426);

    let start = 831 * CHUNK_GROESSE as usize;
    let erwartet: Vec<u8> = (start..MEDIEN_GROESSE).map(medien_byte).collect();
    assert_eq!(chunk, erwartet);
}

#[tokio::test]
async fn chunk_hinter_dateiende_kostet_nichts() {
    let umgebung = testumgebung(1000).await;
    let client = angemeldeter_client(&umgebung).await;

    let ergebnis = umgebung.dienst.download(client.id, "album", 832).await;
    assert!(matches!(
        ergebnis,
        Err(DienstFehler::Katalog(KatalogFehler::UngueltigerChunk {
            index: 832,
            anzahl: 832,
            ..
        }))
    ));
    assert_eq!(umgebung.lizenzen.guthaben("alice").await.unwrap(), 1000);
}

#[tokio::test]
async fn leeres_medium_hat_keinen_chunk_null() {
    let umgebung = testumgebung(1000).await;
    let client = angemeldeter_client(&umgebung).await;

    let ergebnis = umgebung.dienst.download(client.id, "leer", 0).await;
    assert!(matches!(
        ergebnis,
        Err(DienstFehler::Katalog(KatalogFehler::UngueltigerChunk {
            anzahl: 0,
            ..
        }))
    ));
}

#[tokio::test]
async fn parallele_downloads_buchen_exakt() {
    let umgebung = testumgebung(MEDIEN_DAUER * 8).await;
    let client = angemeldeter_client(&umgebung).await;

    let mut tasks = Vec::new();
    for chunk_index in 0..8u64 {
        let dienst = Arc::clone(&umgebung.dienst);
        let session_id = client.id;
        tasks.push(tokio::spawn(async move {
            dienst.download(session_id, "album", chunk_index).await
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    // Jeder Download bucht genau einmal die Mediendauer ab
    assert_eq!(umgebung.lizenzen.guthaben("alice").await.unwrap(), 0);

    let ergebnis = umgebung.dienst.download(client.id, "album", 8).await;
    assert!(matches!(
        ergebnis,
        Err(DienstFehler::Lizenz(LizenzFehler::GuthabenErschoepft { .. }))
    ));
}

#[tokio::test]
async fn falsche_anmeldung_laesst_alles_unveraendert() {
    let umgebung = testumgebung(1000).await;
    let client = client_registrieren(&umgebung.dienst);

    let envelope = anmelde_envelope(&client, "alice", "falsches-passwort");
    let ergebnis = umgebung.dienst.authentifizieren(client.id, &envelope).await;
    assert!(matches!(ergebnis, Err(DienstFehler::AnmeldedatenUngueltig)));

    // Kein Zugriff auf geschuetzte Endpunkte, kein Guthaben-Effekt
    let ergebnis = umgebung.dienst.download(client.id, "album", 0).await;
    assert!(matches!(ergebnis, Err(DienstFehler::NichtAutorisiert)));
    assert_eq!(umgebung.lizenzen.guthaben("alice").await.unwrap(), 1000);

    // Die Session darf sich danach korrekt anmelden
    let envelope = anmelde_envelope(&client, "alice", "geheim");
    umgebung
        .dienst
        .authentifizieren(client.id, &envelope)
        .await
        .unwrap();
}

#[tokio::test]
async fn abgemeldete_session_ist_unbekannt() {
    let umgebung = testumgebung(1000).await;
    let client = angemeldeter_client(&umgebung).await;

    assert!(umgebung.dienst.abmelden(client.id));
    let ergebnis = umgebung.dienst.download(client.id, "album", 0).await;
    assert!(matches!(ergebnis, Err(DienstFehler::Session(_))));
}
