//! DH-Domaenenparameter (Parameter Authority)
//!
//! Haelt die serverweite DH-Gruppe (Primzahl-Modulus + Generator).
//! Wird einmal beim Start geladen und danach nur noch gelesen.
//! Standard ist die MODP-2048-Gruppe aus RFC 3526; ueber eine
//! TOML-Datei laesst sich eine eigene Gruppe hinterlegen.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use num_bigint_dig::BigUint;
use serde::{Deserialize, Serialize};

use crate::error::{KryptoFehler, KryptoResult};

/// RFC 3526, Gruppe 14 (2048 Bit), Generator 2
const MODP_2048_HEX: &str = concat!(
    "FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD129024E088A67CC74",
    "020BBEA63B139B22514A08798E3404DDEF9519B3CD3A431B302B0A6DF25F1437",
    "4FE1356D6D51C245E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B7ED",
    "EE386BFB5A899FA5AE9F24117C4B1FE649286651ECE45B3DC2007CB8A163BF05",
    "98DA48361C55D39A69163FA8FD24CF5F83655D23DCA3AD961C62F356208552BB",
    "9ED529077096966D670C354E4ABC9804F1746C08CA18217C32905E462E36CE3B",
    "E39E772C180E86039B2783A2EC07A28FB5C55DF06F4C52C9DE2BCBF695581718",
    "3995497CEA956AE515D2261898FA051015728E5A8AACAA68FFFFFFFFFFFFFFFF",
);

/// Die serverweite DH-Gruppe
///
/// Unveraenderlich nach dem Laden; wird als `Arc` von allen Sessions
/// gemeinsam gelesen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainParameters {
    /// Primzahl-Modulus p
    pub p: BigUint,
    /// Generator g
    pub g: BigUint,
}

/// TOML-Form einer eigenen Gruppe (`prime_hex`, `generator_hex`)
#[derive(Debug, Deserialize)]
struct ParameterDatei {
    prime_hex: String,
    generator_hex: String,
}

/// Publikationsform der Gruppe fuer den unauthentifizierten Endpunkt
///
/// Beide Felder sind base64-kodierte big-endian Bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterVeroeffentlichung {
    pub prime: String,
    pub generator: String,
}

impl DomainParameters {
    /// Die Standard-Gruppe: RFC 3526 MODP-2048
    pub fn standard() -> Self {
        let p = BigUint::parse_bytes(MODP_2048_HEX.as_bytes(), 16)
            .expect("RFC-3526-Konstante ist gueltiges Hex");
        Self {
            p,
            g: BigUint::from(2u32),
        }
    }

    /// Laedt die Gruppe beim Serverstart
    ///
    /// Ohne Pfad wird die Standard-Gruppe verwendet. Eine angegebene,
    /// aber unlesbare oder fehlerhafte Datei ist fatal.
    pub fn laden(pfad: Option<&str>) -> anyhow::Result<Self> {
        let Some(pfad) = pfad else {
            return Ok(Self::standard());
        };

        let inhalt = std::fs::read_to_string(pfad)
            .map_err(|e| anyhow::anyhow!("Parameterdatei '{pfad}' nicht lesbar: {e}"))?;
        let datei: ParameterDatei = toml::from_str(&inhalt)
            .map_err(|e| anyhow::anyhow!("Parameterdatei '{pfad}' fehlerhaft: {e}"))?;

        let p = BigUint::parse_bytes(datei.prime_hex.trim().as_bytes(), 16)
            .ok_or_else(|| anyhow::anyhow!("prime_hex in '{pfad}' ist kein Hex"))?;
        let g = BigUint::parse_bytes(datei.generator_hex.trim().as_bytes(), 16)
            .ok_or_else(|| anyhow::anyhow!("generator_hex in '{pfad}' ist kein Hex"))?;

        if p < BigUint::from(5u32) || g < BigUint::from(2u32) {
            anyhow::bail!("Parameterdatei '{pfad}' beschreibt keine brauchbare Gruppe");
        }

        Ok(Self { p, g })
    }

    /// Serialisiert die Gruppe fuer die Publikation
    pub fn veroeffentlichung(&self) -> ParameterVeroeffentlichung {
        ParameterVeroeffentlichung {
            prime: BASE64.encode(self.p.to_bytes_be()),
            generator: BASE64.encode(self.g.to_bytes_be()),
        }
    }

    /// Rekonstruiert eine Gruppe aus der Publikationsform (Client-Seite)
    pub fn aus_veroeffentlichung(v: &ParameterVeroeffentlichung) -> KryptoResult<Self> {
        let p = BigUint::from_bytes_be(&BASE64.decode(&v.prime)?);
        let g = BigUint::from_bytes_be(&BASE64.decode(&v.generator)?);
        if p < BigUint::from(5u32) {
            return Err(KryptoFehler::UngueltigeDaten(
                "Publizierter Modulus ist zu klein".to_string(),
            ));
        }
        Ok(Self { p, g })
    }

    /// Prueft ob ein Peer-Schluessel ein gueltiges Gruppenelement ist
    ///
    /// Gueltig heisst 2 <= y <= p-2; die Raender wuerden ein triviales
    /// Shared Secret erzeugen.
    pub fn enthaelt(&self, peer: &BigUint) -> bool {
        let eins = BigUint::from(1u32);
        let obergrenze = &self.p - &eins;
        peer > &eins && peer < &obergrenze
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_gruppe_hat_2048_bit() {
        let params = DomainParameters::standard();
        assert_eq!(params.p.bits(), 2048);
        assert_eq!(params.g, BigUint::from(2u32));
    }

    #[test]
    fn veroeffentlichung_roundtrip() {
        let params = DomainParameters::standard();
        let publikation = params.veroeffentlichung();
        let rekonstruiert = DomainParameters::aus_veroeffentlichung(&publikation).unwrap();
        assert_eq!(rekonstruiert, params);
    }

    #[test]
    fn raender_sind_keine_gruppenelemente() {
        let params = DomainParameters::standard();
        let eins = BigUint::from(1u32);

        assert!(!params.enthaelt(&BigUint::from(0u32)));
        assert!(!params.enthaelt(&eins));
        assert!(!params.enthaelt(&(&params.p - &eins)));
        assert!(!params.enthaelt(&params.p));
        assert!(params.enthaelt(&BigUint::from(2u32)));
    }

    #[test]
    fn laden_ohne_pfad_gibt_standard() {
        let params = DomainParameters::laden(None).unwrap();
        assert_eq!(params, DomainParameters::standard());
    }

    #[test]
    fn laden_mit_fehlendem_pfad_ist_fatal() {
        let ergebnis = DomainParameters::laden(Some("/nicht/vorhanden.toml"));
        assert!(ergebnis.is_err());
    }

    #[test]
    fn ungueltige_publikation_abgelehnt() {
        let kaputt = ParameterVeroeffentlichung {
            prime: "kein base64 !!!".to_string(),
            generator: "Ag==".to_string(),
        };
        assert!(DomainParameters::aus_veroeffentlichung(&kaputt).is_err());
    }
}
