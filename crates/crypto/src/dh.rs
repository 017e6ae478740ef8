//! Ephemere DH-Schluesselpaare und der eigentliche Austausch
//!
//! Pro Session wird ein frisches Schluesselpaar ueber der geladenen
//! Gruppe erzeugt. Das Shared Secret entsteht genau einmal, bei der
//! Session-Erstellung, und ist danach die einzige
//! Schluesselableitungs-Wurzel der Session.

use num_bigint_dig::BigUint;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{KryptoFehler, KryptoResult};
use crate::params::DomainParameters;
use crate::types::{DhSchluesselPaar, SecretBytes};

/// Laenge des privaten Exponenten in Bytes (384 Bit)
const EXPONENT_LAENGE: usize = 48;

/// Erzeugt ein frisches ephemeres Schluesselpaar ueber der Gruppe
pub fn schluesselpaar_erzeugen(params: &DomainParameters) -> DhSchluesselPaar {
    let mut buf = [0u8; EXPONENT_LAENGE];
    OsRng.fill_bytes(&mut buf);
    // Hoechstes Bit setzen, damit der Exponent immer >= 2^383 ist
    buf[0] |= 0x80;

    let privat = BigUint::from_bytes_be(&buf);
    let oeffentlich = params.g.modpow(&privat, &params.p);

    DhSchluesselPaar { privat, oeffentlich }
}

/// Fuehrt den DH-Austausch mit dem Peer-Schluessel durch
///
/// Validiert zuerst die Gruppenzugehoerigkeit des Peer-Schluessels
/// (2 <= y <= p-2) und gibt dann `peer^privat mod p` als big-endian
/// Bytes zurueck.
pub fn austausch(
    params: &DomainParameters,
    paar: &DhSchluesselPaar,
    peer_oeffentlich: &BigUint,
) -> KryptoResult<SecretBytes> {
    if !params.enthaelt(peer_oeffentlich) {
        return Err(KryptoFehler::UngueltigerPeerKey(
            "Schluessel liegt ausserhalb von [2, p-2]".to_string(),
        ));
    }

    let geteilt = peer_oeffentlich.modpow(&paar.privat, &params.p);
    Ok(SecretBytes::new(geteilt.to_bytes_be()))
}

/// Dekodiert einen big-endian serialisierten Peer-Schluessel
pub fn peer_schluessel_dekodieren(bytes: &[u8]) -> KryptoResult<BigUint> {
    if bytes.is_empty() {
        return Err(KryptoFehler::UngueltigerPeerKey(
            "Leerer Peer-Schluessel".to_string(),
        ));
    }
    Ok(BigUint::from_bytes_be(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beide_seiten_leiten_dasselbe_secret_ab() {
        let params = DomainParameters::standard();

        let server = schluesselpaar_erzeugen(&params);
        let client = schluesselpaar_erzeugen(&params);

        let secret_server = austausch(&params, &server, &client.oeffentlich).unwrap();
        let secret_client = austausch(&params, &client, &server.oeffentlich).unwrap();

        assert_eq!(secret_server.as_bytes(), secret_client.as_bytes());
        assert!(!secret_server.is_empty());
    }

    #[test]
    fn frische_paare_sind_verschieden() {
        let params = DomainParameters::standard();
        let a = schluesselpaar_erzeugen(&params);
        let b = schluesselpaar_erzeugen(&params);
        assert_ne!(a.oeffentlich, b.oeffentlich);
    }

    #[test]
    fn peer_key_ausserhalb_der_gruppe_abgelehnt() {
        let params = DomainParameters::standard();
        let paar = schluesselpaar_erzeugen(&params);

        let null = BigUint::from(0u32);
        let eins = BigUint::from(1u32);
        let p_minus_1 = &params.p - &eins;

        for peer in [null, eins, p_minus_1, params.p.clone()] {
            let ergebnis = austausch(&params, &paar, &peer);
            assert!(matches!(ergebnis, Err(KryptoFehler::UngueltigerPeerKey(_))));
        }
    }

    #[test]
    fn oeffentlicher_schluessel_roundtrip() {
        let params = DomainParameters::standard();
        let paar = schluesselpaar_erzeugen(&params);

        let bytes = paar.oeffentlich_bytes();
        let dekodiert = peer_schluessel_dekodieren(&bytes).unwrap();
        assert_eq!(dekodiert, paar.oeffentlich);
    }

    #[test]
    fn leerer_peer_schluessel_abgelehnt() {
        assert!(peer_schluessel_dekodieren(&[]).is_err());
    }
}
