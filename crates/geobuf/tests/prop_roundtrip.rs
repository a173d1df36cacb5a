use geobuf::{
    decode, decode_data, encode, encode_with_options, EncodeOptions, Feature, FeatureCollection,
    GeoDocument, Geometry, Position, PropertyValue, Shape,
};
use proptest::prelude::*;

fn snap(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}

fn position(dimensions: usize) -> impl Strategy<Value = Position> {
    prop::collection::vec(-180.0f64..180.0, dimensions)
}

fn closed_ring() -> impl Strategy<Value = Vec<Position>> {
    prop::collection::vec(position(2), 3..12).prop_map(|mut ring| {
        ring.push(ring[0].clone());
        ring
    })
}

fn property_value() -> impl Strategy<Value = PropertyValue> {
    prop_oneof![
        ".{0,16}".prop_map(PropertyValue::Text),
        any::<u64>().prop_map(PropertyValue::UnsignedInteger),
        (1..=u64::MAX).prop_map(PropertyValue::NegativeInteger),
        any::<bool>().prop_map(PropertyValue::Boolean),
        (-1e9f64..1e9).prop_filter_map("integral", |v| {
            (v.fract() != 0.0).then_some(PropertyValue::Double(v))
        }),
    ]
}

proptest! {
    #[test]
    fn prop_line_roundtrip_matches_quantized_input(
        points in prop::collection::vec(position(3), 0..64),
        precision in 0u32..=9,
        dimensions in 2u32..=3,
    ) {
        let document = GeoDocument::from(Geometry::line_string(points.clone()));
        let options = EncodeOptions::new().with_precision(precision).with_dimensions(dimensions);
        let decoded = decode_data(&encode_with_options(&document, options).unwrap()).unwrap();

        let GeoDocument::Geometry(Geometry { shape: Shape::LineString(decoded), .. }) = decoded.document else {
            panic!("expected a line string");
        };
        prop_assert_eq!(decoded.len(), points.len());
        for (d, o) in decoded.iter().zip(&points) {
            prop_assert_eq!(d.len(), dimensions as usize);
            for (dv, ov) in d.iter().zip(o) {
                prop_assert_eq!(*dv, snap(*ov, precision));
            }
        }
    }

    #[test]
    fn prop_polygon_rings_stay_closed(rings in prop::collection::vec(closed_ring(), 1..4)) {
        let document = GeoDocument::from(Geometry::multi_polygon(vec![rings.clone(), rings.clone()]));
        let decoded = decode(&encode(&document).unwrap()).unwrap();

        let GeoDocument::Geometry(Geometry { shape: Shape::MultiPolygon(polygons), .. }) = decoded else {
            panic!("expected a multi polygon");
        };
        prop_assert_eq!(polygons.len(), 2);
        for polygon in &polygons {
            prop_assert_eq!(polygon.len(), rings.len());
            for (ring, original) in polygon.iter().zip(&rings) {
                prop_assert_eq!(ring.len(), original.len());
                prop_assert_eq!(&ring[0], &ring[ring.len() - 1]);
            }
        }
    }

    #[test]
    fn prop_properties_roundtrip(
        properties in prop::collection::btree_map("[a-z]{1,8}", property_value(), 0..12),
        custom in prop::collection::btree_map("[A-Z]{1,8}", property_value(), 0..4),
    ) {
        let mut feature = Feature::new(Geometry::point(vec![0.0, 0.0]));
        feature.properties = properties;
        feature.custom_properties = custom;
        let document = GeoDocument::from(FeatureCollection::new(vec![feature.clone(), feature]));

        let decoded = decode(&encode(&document).unwrap()).unwrap();
        prop_assert_eq!(decoded, document);
    }

    #[test]
    fn prop_decode_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = decode(&bytes);
    }
}
