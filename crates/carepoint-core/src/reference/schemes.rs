//! Government health schemes.

use crate::models::{HealthScheme, SchemeCategory};

pub static HEALTH_SCHEMES: [HealthScheme; 7] = [
    HealthScheme {
        id: "janani-suraksha",
        name: "Janani Suraksha Yojana",
        name_pa: "ਜਨਨੀ ਸੁਰੱਖਿਆ ਯੋਜਨਾ",
        description: "Financial assistance for institutional delivery",
        description_pa: "ਸੰਸਥਾਗਤ ਡਿਲੀਵਰੀ ਲਈ ਵਿੱਤੀ ਸਹਾਇਤਾ",
        eligibility: "Pregnant women below poverty line",
        eligibility_pa: "ਗਰੀਬੀ ਰੇਖਾ ਤੋਂ ਹੇਠਾਂ ਗਰਭਵਤੀ ਔਰਤਾਂ",
        benefits: "Rural: Rs. 700, Urban: Rs. 600, Home delivery: Rs. 500",
        benefits_pa: "ਪੇਂਡੂ: ਰੁ. 700, ਸ਼ਹਿਰੀ: ਰੁ. 600, ਘਰੇਲੂ ਡਿਲੀਵਰੀ: ਰੁ. 500",
        category: SchemeCategory::Maternal,
    },
    HealthScheme {
        id: "shishu-suraksha",
        name: "Shishu Suraksha Karyakram",
        name_pa: "ਸ਼ਿਸ਼ੂ ਸੁਰੱਖਿਆ ਕਾਰਯਕ੍ਰਮ",
        description: "Free treatment for pregnant women and children up to 1 year",
        description_pa: "ਗਰਭਵਤੀ ਔਰਤਾਂ ਅਤੇ 1 ਸਾਲ ਤੱਕ ਦੇ ਬੱਚਿਆਂ ਲਈ ਮੁਫਤ ਇਲਾਜ",
        eligibility: "All pregnant women and children up to 1 year",
        eligibility_pa: "ਸਾਰੀਆਂ ਗਰਭਵਤੀ ਔਰਤਾਂ ਅਤੇ 1 ਸਾਲ ਤੱਕ ਦੇ ਬੱਚੇ",
        benefits: "Free delivery, food for 3-7 days, free blood transfusion",
        benefits_pa: "ਮੁਫਤ ਡਿਲੀਵਰੀ, 3-7 ਦਿਨ ਭੋਜਨ, ਮੁਫਤ ਖੂਨ ਚੜ੍ਹਾਉਣਾ",
        category: SchemeCategory::Maternal,
    },
    HealthScheme {
        id: "kanyak-sambhal",
        name: "Kanyak Sambhal",
        name_pa: "ਕੰਨਿਆਕ ਸੰਭਾਲ",
        description: "Free treatment for girl children up to 5 years",
        description_pa: "5 ਸਾਲ ਤੱਕ ਦੀਆਂ ਬੱਚੀਆਂ ਲਈ ਮੁਫਤ ਇਲਾਜ",
        eligibility: "Girl children up to 5 years of age",
        eligibility_pa: "5 ਸਾਲ ਤੱਕ ਦੀਆਂ ਬੱਚੀਆਂ",
        benefits: "Free and zero expense treatment",
        benefits_pa: "ਮੁਫਤ ਅਤੇ ਜ਼ੀਰੋ ਖਰਚ ਇਲਾਜ",
        category: SchemeCategory::Child,
    },
    HealthScheme {
        id: "rashtriya-bal-swasth",
        name: "Rashtriya Bal Swasth Karyakram",
        name_pa: "ਰਾਸ਼ਟਰੀ ਬਾਲ ਸਵਾਸਥ ਕਾਰਯਕ੍ਰਮ",
        description: "Free treatment for 30 diseases for children 0-18 years",
        description_pa: "0-18 ਸਾਲ ਦੇ ਬੱਚਿਆਂ ਲਈ 30 ਬਿਮਾਰੀਆਂ ਦਾ ਮੁਫਤ ਇਲਾਜ",
        eligibility: "Children 0-18 years registered in Anganwadi or govt schools",
        eligibility_pa: "ਆਂਗਨਵਾੜੀ ਜਾਂ ਸਰਕਾਰੀ ਸਕੂਲਾਂ ਵਿੱਚ ਰਜਿਸਟਰਡ 0-18 ਸਾਲ ਦੇ ਬੱਚੇ",
        benefits: "Free treatment for 30 types of diseases",
        benefits_pa: "30 ਕਿਸਮ ਦੀਆਂ ਬਿਮਾਰੀਆਂ ਦਾ ਮੁਫਤ ਇਲਾਜ",
        category: SchemeCategory::Child,
    },
    HealthScheme {
        id: "cancer-rahat",
        name: "Mukhya Mantri Cancer Rahat Kosh Yojana",
        name_pa: "ਮੁੱਖ ਮੰਤਰੀ ਕੈਂਸਰ ਰਾਹਤ ਕੋਸ਼ ਯੋਜਨਾ",
        description: "Cancer treatment support up to Rs. 1.5 lakh",
        description_pa: "ਕੈਂਸਰ ਦੇ ਇਲਾਜ ਲਈ 1.5 ਲੱਖ ਰੁਪਏ ਤੱਕ ਦੀ ਸਹਾਇਤਾ",
        eligibility: "Cancer patients",
        eligibility_pa: "ਕੈਂਸਰ ਦੇ ਮਰੀਜ਼",
        benefits: "Treatment support up to Rs. 1.5 lakh",
        benefits_pa: "1.5 ਲੱਖ ਰੁਪਏ ਤੱਕ ਇਲਾਜ ਦੀ ਸਹਾਇਤਾ",
        category: SchemeCategory::General,
    },
    HealthScheme {
        id: "hepatitis-c",
        name: "Mukhya Mantri Hepatitis C Relief Fund",
        name_pa: "ਮੁੱਖ ਮੰਤਰੀ ਹੈਪੇਟਾਈਟਿਸ ਸੀ ਰਾਹਤ ਫੰਡ",
        description: "Free Hepatitis C treatment in district hospitals",
        description_pa: "ਜ਼ਿਲ੍ਹਾ ਹਸਪਤਾਲਾਂ ਵਿੱਚ ਮੁਫਤ ਹੈਪੇਟਾਈਟਿਸ ਸੀ ਇਲਾਜ",
        eligibility: "Hepatitis C patients",
        eligibility_pa: "ਹੈਪੇਟਾਈਟਿਸ ਸੀ ਦੇ ਮਰੀਜ਼",
        benefits: "Free treatment in district hospitals",
        benefits_pa: "ਜ਼ਿਲ੍ਹਾ ਹਸਪਤਾਲਾਂ ਵਿੱਚ ਮੁਫਤ ਇਲਾਜ",
        category: SchemeCategory::General,
    },
    HealthScheme {
        id: "sehat-bima",
        name: "Bhagat Puran Singh Sehat Bima Yojana",
        name_pa: "ਭਗਤ ਪੂਰਨ ਸਿੰਘ ਸਿਹਤ ਬੀਮਾ ਯੋਜਨਾ",
        description: "Health insurance for blue card holders",
        description_pa: "ਨੀਲੇ ਕਾਰਡ ਧਾਰਕਾਂ ਲਈ ਸਿਹਤ ਬੀਮਾ",
        eligibility: "Blue card holders",
        eligibility_pa: "ਨੀਲੇ ਕਾਰਡ ਧਾਰਕ",
        benefits: "Free treatment up to Rs. 50,000, Insurance cover Rs. 5 lakh",
        benefits_pa: "50,000 ਰੁਪਏ ਤੱਕ ਮੁਫਤ ਇਲਾਜ, 5 ਲੱਖ ਰੁਪਏ ਬੀਮਾ ਕਵਰ",
        category: SchemeCategory::Insurance,
    },
];
