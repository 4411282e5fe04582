//! Unit-Tests fuer die SessionRegistry

use hinterzimmer_core::RaumId;

use crate::error::RaumError;
use crate::registry::SessionRegistry;
use crate::types::nickname_hash_berechnen;

fn abdruck(nummer: u8) -> String {
    format!("abdruck-{nummer:02x}").repeat(4)
}

#[tokio::test]
async fn registrieren_und_auflisten() {
    let registry = SessionRegistry::neu();
    let raum = RaumId::new();

    let id = registry
        .registrieren(raum, "Anna", &nickname_hash_berechnen("Anna"), &abdruck(1))
        .await
        .expect("Registrierung fehlgeschlagen");

    assert!(registry.sitzung_vorhanden(raum, id).await);
    assert_eq!(registry.anzahl_sitzungen(raum).await, 1);

    let liste = registry.oeffentliche_liste(raum).await;
    assert_eq!(liste.len(), 1);
    assert_eq!(liste[0].nickname_hash, nickname_hash_berechnen("Anna"));
}

#[tokio::test]
async fn doppelter_nickname_wird_abgelehnt() {
    let registry = SessionRegistry::neu();
    let raum = RaumId::new();

    registry
        .registrieren(raum, "Anna", "hash-a", &abdruck(1))
        .await
        .unwrap();

    // Gross-/Kleinschreibung und Leerraum zaehlen nicht als Unterschied
    let ergebnis = registry
        .registrieren(raum, "  anna ", "hash-b", &abdruck(2))
        .await;
    assert!(matches!(ergebnis, Err(RaumError::NicknameVergeben(_))));
}

#[tokio::test]
async fn gleicher_nickname_in_verschiedenen_raeumen_ist_erlaubt() {
    let registry = SessionRegistry::neu();

    registry
        .registrieren(RaumId::new(), "Anna", "hash-a", &abdruck(1))
        .await
        .unwrap();
    let ergebnis = registry
        .registrieren(RaumId::new(), "Anna", "hash-a", &abdruck(2))
        .await;
    assert!(ergebnis.is_ok());
}

#[tokio::test]
async fn geraet_in_anderem_raum_wird_abgelehnt() {
    let registry = SessionRegistry::neu();

    registry
        .registrieren(RaumId::new(), "Anna", "hash-a", &abdruck(1))
        .await
        .unwrap();

    let ergebnis = registry
        .registrieren(RaumId::new(), "Bob", "hash-b", &abdruck(1))
        .await;
    assert!(matches!(ergebnis, Err(RaumError::GeraetBereitsGebunden)));
}

#[tokio::test]
async fn reconnect_ersetzt_alte_sitzung() {
    let registry = SessionRegistry::neu();
    let raum = RaumId::new();

    let alt = registry
        .registrieren(raum, "Anna", "hash-a", &abdruck(1))
        .await
        .unwrap();
    let neu = registry
        .registrieren(raum, "Anna", "hash-a", &abdruck(1))
        .await
        .expect("Reconnect muss erlaubt sein");

    assert_ne!(alt, neu);
    assert!(!registry.sitzung_vorhanden(raum, alt).await);
    assert!(registry.sitzung_vorhanden(raum, neu).await);
    assert_eq!(registry.anzahl_sitzungen(raum).await, 1);
}

#[tokio::test]
async fn abmelden_loest_geraete_bindung() {
    let registry = SessionRegistry::neu();
    let raum_a = RaumId::new();
    let raum_b = RaumId::new();

    let id = registry
        .registrieren(raum_a, "Anna", "hash-a", &abdruck(1))
        .await
        .unwrap();
    registry.abmelden(raum_a, id).await;

    // Nach dem Abmelden darf das Geraet einen anderen Raum betreten
    let ergebnis = registry
        .registrieren(raum_b, "Anna", "hash-a", &abdruck(1))
        .await;
    assert!(ergebnis.is_ok());
    assert_eq!(registry.anzahl_sitzungen(raum_a).await, 0);
}

#[tokio::test]
async fn abmelden_unbekannter_sitzung_ist_harmlos() {
    let registry = SessionRegistry::neu();
    let raum = RaumId::new();
    registry
        .abmelden(raum, hinterzimmer_core::SitzungsId::new())
        .await;
    assert_eq!(registry.anzahl_sitzungen(raum).await, 0);
}

#[tokio::test]
async fn gleichzeitige_registrierung_genau_ein_erfolg() {
    let registry = SessionRegistry::neu();
    let raum = RaumId::new();

    let abdruck_a = abdruck(1);
    let abdruck_b = abdruck(2);
    let (a, b) = tokio::join!(
        registry.registrieren(raum, "Anna", "hash-a", &abdruck_a),
        registry.registrieren(raum, "anna", "hash-b", &abdruck_b),
    );

    let erfolge = [a.is_ok(), b.is_ok()].iter().filter(|&&ok| ok).count();
    assert_eq!(erfolge, 1, "Genau eine Registrierung darf durchkommen");

    let fehler = [a, b].into_iter().find(|e| e.is_err()).unwrap();
    assert!(matches!(fehler, Err(RaumError::NicknameVergeben(_))));
}

#[tokio::test]
async fn oeffentliche_liste_enthaelt_keinen_abdruck() {
    let registry = SessionRegistry::neu();
    let raum = RaumId::new();
    registry
        .registrieren(raum, "Anna", "hash-a", &abdruck(1))
        .await
        .unwrap();

    let liste = registry.oeffentliche_liste(raum).await;
    let json = serde_json::to_string(&liste).unwrap();
    assert!(json.contains("nicknameHash"));
    assert!(json.contains("connectedAt"));
    assert!(!json.contains("abdruck"), "Geraete-Abdruck darf nicht erscheinen");
}
