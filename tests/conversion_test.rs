use anyhow::Result;
use size_grid_etl::core::filter::should_skip;
use size_grid_etl::core::normalize::{normalize_number_like, parse_range_to_pair};
use size_grid_etl::{
    convert_csv, discover_schema, transform_row, ConversionOptions, InputRow, Lookups,
    RangeValue,
};

const HEADER: &str = "TGL_FILTER_CODE,SizeGrid_Code_Category,Ge Code,Gender,SizeGrid_lvl2_cat,\
SizeGrid_Code,TGL_COD,EU_ALS,FRA_ALS,IT_ALS,JP_ALS,UK_ALS,US_ALS,TipoDim1,Dim1,TipoDim2,Dim2";

fn grid(lines: &[&str]) -> String {
    let mut text = String::from(HEADER);
    for line in lines {
        text.push('\n');
        text.push_str(line);
    }
    text.push('\n');
    text
}

fn column(csv: &str, name: &str) -> Vec<String> {
    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let index = reader
        .headers()
        .unwrap()
        .iter()
        .position(|h| h == name)
        .unwrap_or_else(|| panic!("missing column {}", name));
    reader
        .records()
        .map(|r| r.unwrap().get(index).unwrap_or("").to_string())
        .collect()
}

/// 端到端：鞋類、童裝代碼與逗號小數
#[test]
fn test_shoe_row_end_to_end() -> Result<()> {
    let text = "Ge Code,Gender,SizeGrid_lvl2_cat,TipoDim1,Dim1\nM,93-kids-code,SHOES RUNNING,Lunghezza,\"24,5\"\n";

    let result = convert_csv(text, Lookups::standard(), &ConversionOptions::default())?;
    let output = &result.csv_output;

    assert_eq!(column(output, "gender"), vec!["male"]);
    assert_eq!(column(output, "ageGroup"), vec!["kids"]);
    assert_eq!(column(output, "strongCategoryType"), vec!["shoe"]);
    assert_eq!(column(output, "insoleLengthInitialValue"), vec!["24.5"]);
    assert_eq!(column(output, "insoleLengthFinalValue"), vec!["24.5"]);
    assert_eq!(column(output, "type"), vec!["product"]);
    assert_eq!(column(output, "accessories"), vec!["FALSE"]);
    assert_eq!(column(output, "sizeSystem"), vec!["EU"]);
    Ok(())
}

#[test]
fn test_full_grid_conversion() -> Result<()> {
    let text = grid(&[
        "CLO,Giacca  Uomo,M,60,JACKETS,EA7,48,48,44,48,M,38,38,Torace,96-100,Vita,84",
        "CLO,Giacca  Uomo,M,60,JACKETS,EA7,50,50,46,50,L,40,40,Torace,100-104,Vita,88",
        "ACCESSORY,Cintura,M,60,BELTS,EA7,90,90,90,90,90,36,36,Circonferenza,90,,",
    ]);

    let result = convert_csv(&text, Lookups::standard(), &ConversionOptions::default())?;
    let output = &result.csv_output;

    println!("📄 Output:\n{}", output);
    assert_eq!(result.rows_read, 3);
    assert_eq!(result.rows_skipped, 1);
    assert_eq!(column(output, "name"), vec!["Giacca Uomo", "Giacca Uomo"]);
    assert_eq!(column(output, "sizeName"), vec!["48", "50"]);
    assert_eq!(column(output, "ss-FR"), vec!["44", "46"]);
    assert_eq!(column(output, "chestInitialValue"), vec!["96", "100"]);
    assert_eq!(column(output, "chestFinalValue"), vec!["100", "104"]);
    assert_eq!(column(output, "waistFinalValue"), vec!["84", "88"]);
    assert!(!output.contains("circumference"));
    Ok(())
}

#[test]
fn test_output_header_order() -> Result<()> {
    let text = grid(&[
        "CLO,A,W,30,DRESSES,B,40,40,36,40,9,8,4,Seno,84,Fianchi,90",
        "CLO,A,W,30,DRESSES,B,42,42,38,42,11,10,6,Sottoseno,70,Polpaccio,35",
    ]);

    let result = convert_csv(&text, Lookups::standard(), &ConversionOptions::default())?;
    let header = result.csv_output.lines().next().unwrap_or_default();

    assert_eq!(
        header,
        "name,gender,ageGroup,strongCategoryType,brandName,type,accessories,sizeSystem,\
sizeName,ss-EU,ss-FR,ss-IT,ss-JP,ss-UK,ss-US,categoryNames,\
chestInitialValue,chestFinalValue,hipInitialValue,hipFinalValue,\
underBustInitialValue,underBustFinalValue,PolpaccioInitialValue,PolpaccioFinalValue"
    );
    Ok(())
}

#[test]
fn test_rows_present_iff_not_skipped() -> Result<()> {
    let codes = ["CLO", "ACCESSORY", "acc-belt", "", "SHOE", "XACC"];
    let lines: Vec<String> = codes
        .iter()
        .map(|code| format!("{},N,M,60,X,B,{},,,,,,,,,,", code, code))
        .collect();
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let text = grid(&refs);

    let result = convert_csv(&text, Lookups::standard(), &ConversionOptions::default())?;
    let kept = column(&result.csv_output, "sizeName");

    let expected: Vec<String> = codes
        .iter()
        .filter(|code| {
            let row: InputRow = [("TGL_FILTER_CODE", **code)].into_iter().collect();
            !should_skip(&row)
        })
        .map(|code| code.to_string())
        .collect();

    assert_eq!(kept, expected);
    assert_eq!(kept, vec!["CLO", "", "SHOE"]);
    Ok(())
}

#[test]
fn test_first_write_wins_across_indices() -> Result<()> {
    let text = grid(&["CLO,A,M,60,X,B,48,,,,,,,Torace,88-92,Petto,100-104"]);

    let result = convert_csv(&text, Lookups::standard(), &ConversionOptions::default())?;

    assert_eq!(result.schema.measures(), &["chest"]);
    assert_eq!(column(&result.csv_output, "chestInitialValue"), vec!["88"]);
    assert_eq!(column(&result.csv_output, "chestFinalValue"), vec!["92"]);
    Ok(())
}

#[test]
fn test_schema_discovery_is_order_stable() -> Result<()> {
    let rows: Vec<InputRow> = vec![
        [("TipoDim1", "Altezza"), ("TipoDim2", "Gamba")].into_iter().collect(),
        [("TipoDim1", "Spalle"), ("TipoDim2", "Altezza")].into_iter().collect(),
        [("TipoDim1", "Numero"), ("TipoDim2", "Int. Gamba")].into_iter().collect(),
    ];

    let first = discover_schema(&rows, Lookups::standard());
    let second = discover_schema(&rows, Lookups::standard());

    assert_eq!(first, second);
    assert_eq!(
        first.measures(),
        &["height", "thigh", "shoulderWidth", "bar", "insideLeg"]
    );
    Ok(())
}

#[test]
fn test_unmapped_measure_columns() {
    let row: InputRow = [("TipoDim1", "Polpaccio"), ("Dim1", "35-37")]
        .into_iter()
        .collect();

    let schema = discover_schema(std::slice::from_ref(&row), Lookups::standard());
    let columns = schema.columns();
    assert!(columns.contains(&"PolpaccioInitialValue".to_string()));
    assert!(columns.contains(&"PolpaccioFinalValue".to_string()));

    let record = transform_row(&row, Lookups::standard());
    assert_eq!(record.get("PolpaccioInitialValue"), "35");
    assert_eq!(record.get("PolpaccioFinalValue"), "37");
}

#[test]
fn test_normalizer_examples() {
    assert_eq!(normalize_number_like("1.234,5"), "1234.5");
    assert_eq!(normalize_number_like("12,5cm"), "12.5");
    assert_eq!(normalize_number_like("42"), "42");

    for raw in ["1.234,5", "12,5cm", "42", " 30\" ", "ca. 7,25 cm", "abc"] {
        let once = normalize_number_like(raw);
        assert_eq!(normalize_number_like(&once), once, "not idempotent for {raw:?}");
    }

    assert_eq!(parse_range_to_pair("80-85"), RangeValue::new("80", "85"));
    assert_eq!(parse_range_to_pair("90"), RangeValue::new("90", "90"));
    assert_eq!(parse_range_to_pair(""), RangeValue::empty());
}
