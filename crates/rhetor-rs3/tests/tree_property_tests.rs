use proptest::prelude::*;
use rhetor_rs3::RstTree;

fn word() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z]{1,6}(\\.|,|\\?|!)?").unwrap()
}

fn segment_text() -> impl Strategy<Value = String> {
    proptest::collection::vec(word(), 0..5).prop_map(|words| words.join(" "))
}

/// One group root with every segment attached under `relname`.
fn flat_document(texts: &[String], relname: &str) -> String {
    let mut xml = String::from(
        "<rst><header><relations><rel name=\"sequence\" type=\"multinuc\"/>\
         <rel name=\"same-unit\" type=\"multinuc\"/><rel name=\"elaboration\" type=\"rst\"/>\
         </relations></header><body><group id=\"1000\" type=\"multinuc\"/>",
    );
    for (i, text) in texts.iter().enumerate() {
        xml.push_str(&format!(
            "<segment id=\"{}\" parent=\"1000\" relname=\"{relname}\">{text}</segment>",
            i + 1
        ));
    }
    xml.push_str("</body></rst>");
    xml
}

proptest! {
    #[test]
    fn sentence_ids_and_token_offsets_are_consistent(texts in proptest::collection::vec(segment_text(), 1..12)) {
        let tree = RstTree::parse_str(&flat_document(&texts, "sequence")).unwrap();
        let segments: Vec<_> = tree
            .sorted_segments()
            .into_iter()
            .map(|node| node.as_segment().unwrap().clone())
            .collect();

        prop_assert_eq!(segments[0].sentence_id, 1);
        prop_assert_eq!(segments[0].initial_token_id, 1);
        for pair in segments.windows(2) {
            prop_assert!(pair[0].sentence_id <= pair[1].sentence_id);
            prop_assert!(pair[1].sentence_id - pair[0].sentence_id <= 1);
            prop_assert_eq!(
                pair[1].initial_token_id,
                pair[0].initial_token_id + pair[0].token_count()
            );
        }
    }

    #[test]
    fn tokens_dict_reproduces_tokens(texts in proptest::collection::vec(segment_text(), 1..12)) {
        let tree = RstTree::parse_str(&flat_document(&texts, "sequence")).unwrap();
        let tokens = tree.tokens().unwrap();
        let dict = tree.tokens_dict().unwrap();
        let ids: Vec<usize> = dict.keys().copied().collect();
        let expected_ids: Vec<usize> = (1..=tokens.len()).collect();
        prop_assert_eq!(ids, expected_ids);
        let values: Vec<&str> = dict.values().copied().collect();
        prop_assert_eq!(values, tokens);
    }

    #[test]
    fn same_unit_chain_selects_exactly_one(n in 1usize..10) {
        let texts: Vec<String> = (0..n).map(|i| format!("part{i}")).collect();
        let tree = RstTree::parse_str(&flat_document(&texts, "same-unit")).unwrap();
        let selected = tree.intra_sentential_relations().unwrap();
        prop_assert_eq!(selected.len(), 1);
        prop_assert_eq!(selected[0].id, 1);
    }

    #[test]
    fn one_sentence_chain_selects_all_but_last(
        n in 1usize..10,
        relname in proptest::sample::select(vec![
            "sequence", "contrast", "list", "joint", "other-rel",
        ]),
    ) {
        let texts: Vec<String> = (0..n).map(|i| format!("step{i}")).collect();
        let tree = RstTree::parse_str(&flat_document(&texts, relname)).unwrap();
        let counts = tree.count_intra_sentential_relations().unwrap();
        prop_assert_eq!(counts.get(relname).copied().unwrap_or(0), n - 1);
        prop_assert!(counts.keys().all(|name| name == relname));
    }
}

#[test]
fn two_elaborations_in_one_sentence() {
    let texts = vec!["Prices rose".to_string(), "sharply today.".to_string()];
    let tree = RstTree::parse_str(&flat_document(&texts, "elaboration")).unwrap();
    let counts = tree.count_intra_sentential_relations().unwrap();
    assert_eq!(counts.len(), 1);
    assert_eq!(counts["elaboration"], 2);
}

#[test]
fn signal_picks_first_and_third_tokens() {
    let tree = RstTree::parse_str(
        r#"<rst><body>
            <group id="9" type="span"/>
            <segment id="1" parent="9" relname="span">However the</segment>
            <segment id="2" parent="1" relname="elaboration">plan failed.</segment>
            <signals><signal source="2" type="dm" subtype="dm" tokens="1,3"/></signals>
        </body></rst>"#,
    )
    .unwrap();
    let signal = tree.signal(0).unwrap();
    assert_eq!(signal.tokens(&tree).unwrap(), vec!["However", "plan"]);
}
