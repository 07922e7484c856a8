use crate::body_type::BodyType;
use crate::consts::SOLAR_MASS;

#[test]
fn test_from_mass_solar_system_anchors() {
    assert_eq!(BodyType::from_mass(SOLAR_MASS), BodyType::Star);
    assert_eq!(BodyType::from_mass(1.898e27), BodyType::GasGiant); // Jupiter
    assert_eq!(BodyType::from_mass(5.683e26), BodyType::GasGiant); // Saturn
    assert_eq!(BodyType::from_mass(1.024e26), BodyType::IceGiant); // Neptune
    assert_eq!(BodyType::from_mass(8.681e25), BodyType::IceGiant); // Uranus
    assert_eq!(BodyType::from_mass(5.972e24), BodyType::Terrestrial); // Earth
    assert_eq!(BodyType::from_mass(7.342e22), BodyType::Terrestrial); // Moon
    assert_eq!(BodyType::from_mass(1.303e22), BodyType::Ice); // Pluto
}

#[test]
fn test_merge_is_monotonic() {
    use BodyType::*;
    for &a in &[Ice, Terrestrial, IceGiant, GasGiant, Star] {
        for &b in &[Ice, Terrestrial, IceGiant, GasGiant, Star] {
            let merged = a.merged_with(b);
            assert!(merged >= a, "{:?} + {:?} -> {:?}", a, b, merged);
        }
    }
}

#[test]
fn test_giants_and_stars_keep_type() {
    use BodyType::*;
    assert_eq!(GasGiant.merged_with(Star), GasGiant);
    assert_eq!(IceGiant.merged_with(GasGiant), IceGiant);
    assert_eq!(Star.merged_with(GasGiant), Star);
}

#[test]
fn test_small_bodies_take_larger_ordinal() {
    use BodyType::*;
    assert_eq!(Ice.merged_with(Terrestrial), Terrestrial);
    assert_eq!(Terrestrial.merged_with(Ice), Terrestrial);
    assert_eq!(Terrestrial.merged_with(GasGiant), GasGiant);
}

#[test]
fn test_serde_enum_names() {
    assert_eq!(
        serde_json::to_string(&BodyType::IceGiant).unwrap(),
        "\"ICE_GIANT\""
    );
    assert_eq!(
        serde_json::from_str::<BodyType>("\"TERRESTRIAL\"").unwrap(),
        BodyType::Terrestrial
    );
}

#[test]
fn test_skin_constants_positive() {
    use BodyType::*;
    for &t in &[Ice, Terrestrial, IceGiant, GasGiant, Star] {
        assert!(t.thermal_skin_fraction() > 0.0);
        assert!(t.skin_heat_capacity() > 0.0);
    }
}
