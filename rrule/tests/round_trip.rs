// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use almanac_rrule::{RecurrenceRule, RuleOptions};

const CANONICAL_RULES: &[&str] = &[
    "FREQ=WEEKLY;DTSTART=20120201T093000Z;INTERVAL=5;WKST=TU;COUNT=2;UNTIL=20130130T230000Z;BYSETPOS=2;BYMONTH=3;BYYEARDAY=95;BYWEEKNO=1;BYDAY=MO,+2FR;BYHOUR=9;BYMINUTE=30;BYSECOND=0;BYEASTER=-1",
    "FREQ=DAILY",
    "FREQ=MONTHLY;INTERVAL=2;BYMONTHDAY=1,-1",
    "FREQ=YEARLY;COUNT=10;BYMONTH=1,2,3",
    "FREQ=DAILY;DTSTART=TZID=America/New_York:19970714T133000;UNTIL=19971224",
    "FREQ=MONTHLY;DTSTART=19970714T133000;BYDAY=-1SU",
    "FREQ=YEARLY;BYDAY=2FR,+3TH,-1MO",
    "FREQ=SECONDLY;BYHOUR=0,23;BYMINUTE=0,59;BYSECOND=0,59",
];

#[test]
fn canonical_rules_serialize_byte_for_byte() {
    for &src in CANONICAL_RULES {
        let rule: RecurrenceRule = src.parse().unwrap();
        assert_eq!(rule.to_string(), src);
    }
}

#[test]
fn serialized_rules_parse_to_equal_options() {
    for &src in CANONICAL_RULES {
        let options: RuleOptions = src.parse().unwrap();
        let again: RuleOptions = options.to_string().parse().unwrap();
        assert_eq!(again, options);
    }
}

#[test]
fn compiling_keeps_the_original_text() {
    let src = "FREQ=MONTHLY;INTERVAL=3;COUNT=4";
    let mut rule: RecurrenceRule = src.parse().unwrap();
    let start = jiff::civil::date(2024, 1, 31)
        .at(8, 0, 0, 0)
        .in_tz("Europe/Berlin")
        .unwrap();
    rule.compile(&start, &start).unwrap();
    assert_eq!(rule.to_string(), src);
}

#[test]
fn out_of_bounds_month_is_rejected() {
    let err = "FREQ=WEEKLY;INTERVAL=5;BYMONTH=13"
        .parse::<RecurrenceRule>()
        .unwrap_err();
    assert_eq!(err.field(), Some("BYMONTH"));
}
