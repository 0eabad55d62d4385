use box_advisor::model::{PriceData, PriceVector};
use box_advisor::strategies::{EvaluationContext, cut_down};
use box_advisor::{
    ClearanceTable, Dims3, EngineConfig, Feasibility, PackingLevel, ShippingBox, StrategyDetail,
    StrategyKind, StrategyPreferences, Weights, compute, generate,
};

fn reference_box(alternate_depths: Vec<f64>) -> ShippingBox {
    ShippingBox::new(
        "20x15x10",
        Dims3::new(20.0, 15.0, 10.0),
        2,
        PriceData::Flat(PriceVector([5.0, 7.0, 9.0, 11.0])),
        alternate_depths,
    )
    .unwrap()
}

fn context() -> EvaluationContext<'static> {
    EvaluationContext {
        clearances: &ClearanceTable::REFERENCE,
        telescoping_overlap: EngineConfig::DEFAULT_TELESCOPING_OVERLAP,
    }
}

#[test]
fn standard_item_fits_reference_box_as_is() {
    let inventory = vec![reference_box(vec![])];
    let recs = compute(
        &inventory,
        &Dims3::new(18.0, 13.0, 8.0),
        PackingLevel::Standard,
        &ClearanceTable::REFERENCE,
        &EngineConfig::reference_defaults(),
    );

    let normal = recs
        .iter()
        .find(|r| r.strategy() == StrategyKind::Normal)
        .expect("normal packing should be recommended");
    assert_eq!(normal.result.clearances, vec![2.0, 2.0, 2.0]);
    assert_eq!(normal.result.feasibility, Feasibility::Fits);
    assert_eq!(normal.result.tightness_score, 12.0);
    assert_eq!(normal.price(), 7.0);
    assert_eq!(recs[0].strategy(), StrategyKind::Normal);
    assert!(normal.tag.starts_with("No Modifications"));
}

#[test]
fn shallowest_sufficient_prescored_depth_is_chosen() {
    let b = reference_box(vec![8.0, 6.0, 4.0]);
    // 3" open extent plus 2" standard clearance
    let result = cut_down::evaluate(
        &b,
        &Dims3::new(18.0, 13.0, 3.0),
        PackingLevel::Standard,
        &context(),
    );
    assert_eq!(
        result.detail,
        StrategyDetail::CutDown {
            cut_depth: 6.0,
            pre_scored: true
        }
    );
    assert_eq!(result.feasibility, Feasibility::Fits);
}

#[test]
fn shallow_prescores_fall_back_to_manual_cut() {
    let b = reference_box(vec![3.0, 2.0]);
    let result = cut_down::evaluate(
        &b,
        &Dims3::new(18.0, 13.0, 4.0),
        PackingLevel::Standard,
        &context(),
    );
    assert_eq!(
        result.detail,
        StrategyDetail::CutDown {
            cut_depth: 6.0,
            pre_scored: false
        }
    );
    assert_eq!(result.effective_dims, Dims3::new(20.0, 15.0, 6.0));
}

#[test]
fn manual_cut_is_capped_at_open_length() {
    let b = reference_box(vec![]);
    // needs 9 + 4 = 13" at fragile; the box only has 10"
    let result = cut_down::evaluate(
        &b,
        &Dims3::new(14.0, 11.0, 9.0),
        PackingLevel::Fragile,
        &context(),
    );
    assert_eq!(
        result.detail,
        StrategyDetail::CutDown {
            cut_depth: 10.0,
            pre_scored: false
        }
    );
    assert_eq!(result.feasibility, Feasibility::Possible);
}

#[test]
fn extreme_manual_cuts_are_excluded_but_prescored_are_not() {
    let config = EngineConfig::builder(
        Weights::new(0.45, 0.25, 0.30),
        StrategyPreferences::reference(),
    )
    .extreme_cut_threshold(0.5)
    .build()
    .unwrap();
    let item = Dims3::new(18.0, 13.0, 2.0);

    let manual_only = vec![reference_box(vec![])];
    let candidates = generate(
        &manual_only,
        &item,
        PackingLevel::Standard,
        &ClearanceTable::REFERENCE,
        &config,
    );
    assert!(
        candidates
            .iter()
            .all(|c| c.result.strategy() != StrategyKind::CutDown)
    );

    let prescored = vec![reference_box(vec![4.0])];
    let candidates = generate(
        &prescored,
        &item,
        PackingLevel::Standard,
        &ClearanceTable::REFERENCE,
        &config,
    );
    assert!(candidates.iter().any(|c| c.result.detail
        == StrategyDetail::CutDown {
            cut_depth: 4.0,
            pre_scored: true
        }));
}

#[test]
fn cheaper_box_wins_under_price_only_weights() {
    let make = |model: &str, price: f64| {
        ShippingBox::new(
            model,
            Dims3::new(20.0, 15.0, 10.0),
            2,
            PriceData::Flat(PriceVector([price; 4])),
            vec![],
        )
        .unwrap()
    };
    let inventory = vec![make("expensive", 12.0), make("cheap", 4.0)];
    let config = EngineConfig::builder(Weights::new(1.0, 0.0, 0.0), StrategyPreferences::reference())
        .build()
        .unwrap();

    let recs = compute(
        &inventory,
        &Dims3::new(18.0, 13.0, 8.0),
        PackingLevel::NoPack,
        &ClearanceTable::REFERENCE,
        &config,
    );
    let score = |model: &str| {
        recs.iter()
            .find(|r| r.box_id == model && r.strategy() == StrategyKind::Normal)
            .map(|r| r.composite_score)
            .unwrap()
    };
    assert!(score("cheap") <= score("expensive"));
    assert_eq!(recs[0].box_id, "cheap");
    assert!(recs[0].tag.ends_with("Lowest Price"));
    assert_eq!(recs[0].tag_class, "price");
}

#[test]
fn max_recommendations_keeps_the_best_scores() {
    let inventory: Vec<ShippingBox> = (0..10)
        .map(|i| {
            let grow = i as f64;
            ShippingBox::new(
                format!("B{}", i),
                Dims3::new(12.0 + grow, 10.0 + grow, 8.0 + grow),
                2,
                PriceData::Flat(PriceVector([1.0 + grow; 4])),
                vec![],
            )
            .unwrap()
        })
        .collect();
    let item = Dims3::new(9.0, 7.0, 5.0);
    let weights = Weights::new(0.45, 0.25, 0.30);

    let all = compute(
        &inventory,
        &item,
        PackingLevel::Standard,
        &ClearanceTable::REFERENCE,
        &EngineConfig::builder(weights, StrategyPreferences::reference())
            .max_recommendations(100)
            .build()
            .unwrap(),
    );
    assert!(all.len() >= 10);

    let top = compute(
        &inventory,
        &item,
        PackingLevel::Standard,
        &ClearanceTable::REFERENCE,
        &EngineConfig::builder(weights, StrategyPreferences::reference())
            .max_recommendations(3)
            .build()
            .unwrap(),
    );
    assert_eq!(top.len(), 3);
    assert_eq!(top, all[..3].to_vec());
    assert!(
        top.windows(2)
            .all(|w| w[0].composite_score <= w[1].composite_score)
    );
}

#[test]
fn one_recommendation_per_box_and_strategy() {
    let inventory = vec![reference_box(vec![8.0, 7.0, 6.0])];
    let recs = compute(
        &inventory,
        &Dims3::new(18.0, 13.0, 3.0),
        PackingLevel::Standard,
        &ClearanceTable::REFERENCE,
        &EngineConfig::reference_defaults(),
    );
    let cuts: Vec<_> = recs
        .iter()
        .filter(|r| r.strategy() == StrategyKind::CutDown)
        .collect();
    assert_eq!(cuts.len(), 1);
    // the shallowest pre-scored line is the tightest and wins the dedup
    assert_eq!(
        cuts[0].result.detail,
        StrategyDetail::CutDown {
            cut_depth: 6.0,
            pre_scored: true
        }
    );
}

#[test]
fn recommended_cut_is_the_shallowest_sufficient_prescore() {
    let inventory = vec![reference_box(vec![8.0, 6.0, 4.0])];
    // 3" open extent plus 2" standard clearance needs 5"; the 4" line is tighter but too shallow
    let recs = compute(
        &inventory,
        &Dims3::new(18.0, 13.0, 3.0),
        PackingLevel::Standard,
        &ClearanceTable::REFERENCE,
        &EngineConfig::reference_defaults(),
    );
    let cuts: Vec<_> = recs
        .iter()
        .filter(|r| r.strategy() == StrategyKind::CutDown)
        .collect();
    assert_eq!(cuts.len(), 1);
    assert_eq!(
        cuts[0].result.detail,
        StrategyDetail::CutDown {
            cut_depth: 6.0,
            pre_scored: true
        }
    );
    assert_eq!(cuts[0].result.feasibility, Feasibility::Fits);
}

#[test]
fn cut_to_the_full_open_length_is_not_recommended() {
    let inventory = vec![reference_box(vec![])];
    let recs = compute(
        &inventory,
        &Dims3::new(18.0, 13.0, 8.0),
        PackingLevel::Standard,
        &ClearanceTable::REFERENCE,
        &EngineConfig::reference_defaults(),
    );
    assert!(recs.iter().any(|r| r.strategy() == StrategyKind::Normal));
    assert!(recs.iter().all(|r| r.strategy() != StrategyKind::CutDown));
}

#[test]
fn open_axis_survives_duplicate_dimensions() {
    let prices = PriceData::Flat(PriceVector([1.0; 4]));
    let b = ShippingBox::new("dup", Dims3::new(15.0, 10.0, 15.0), 2, prices, vec![]).unwrap();
    assert_eq!(b.sorted_dims, Dims3::new(15.0, 15.0, 10.0));
    assert_eq!(b.open_axis, 1);
    assert_eq!(b.open_length(), 15.0);

    let b = ShippingBox::new("dup", Dims3::new(15.0, 10.0, 15.0), 1, prices, vec![]).unwrap();
    assert_eq!(b.open_axis, 2);
    assert_eq!(b.open_length(), 10.0);
}

#[test]
fn tightness_is_never_negative() {
    let inventory = vec![reference_box(vec![8.0, 6.0, 4.0])];
    for level in PackingLevel::ALL {
        for item in [
            Dims3::new(18.0, 13.0, 8.0),
            Dims3::new(30.0, 12.0, 9.0),
            Dims3::new(22.0, 3.0, 8.0),
            Dims3::new(25.0, 18.0, 0.5),
        ] {
            for rec in compute(
                &inventory,
                &item,
                level,
                &ClearanceTable::REFERENCE,
                &EngineConfig::reference_defaults(),
            ) {
                assert!(rec.result.tightness_score >= 0.0);
                assert_ne!(rec.result.feasibility, Feasibility::Impossible);
            }
        }
    }
}

#[test]
fn long_item_is_telescoped_with_box_count_reason() {
    let inventory = vec![reference_box(vec![])];
    let recs = compute(
        &inventory,
        &Dims3::new(30.0, 12.0, 9.0),
        PackingLevel::Standard,
        &ClearanceTable::REFERENCE,
        &EngineConfig::reference_defaults(),
    );
    let telescoped = recs
        .iter()
        .find(|r| r.strategy() == StrategyKind::Telescoping)
        .expect("telescoping should be offered for a 30\" item");
    // 30 + 2 = 32" needed, 8" usable per box after the 2" overlap
    assert_eq!(telescoped.result.detail, StrategyDetail::Telescoping { box_count: 4 });
    assert_eq!(telescoped.reason, "Uses 4 boxes");
    assert_eq!(telescoped.price(), 3.0 * 7.0 + 9.0);
}
