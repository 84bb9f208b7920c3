//! Hospital directory for Patiala district.

use crate::models::{Hospital, HospitalType};

pub static HOSPITALS: [Hospital; 13] = [
    Hospital {
        id: "ch-nabha",
        name: "CH Nabha",
        phone: "01765-226361",
        email: "smochnabha@gmail.com",
        hospital_type: HospitalType::CH,
        location: "Nabha",
    },
    Hospital {
        id: "ch-rajpura",
        name: "CH Rajpura",
        phone: "01762-225539",
        email: "smoapjchrajpura@gmail.com",
        hospital_type: HospitalType::CH,
        location: "Rajpura",
    },
    Hospital {
        id: "ch-samana",
        name: "CH Samana",
        phone: "01764-220041",
        email: "smochsamana@gmail.com",
        hospital_type: HospitalType::CH,
        location: "Samana",
    },
    Hospital {
        id: "phc-kauli",
        name: "PHC Kauli",
        phone: "0175-2663900",
        email: "nrhmkauli@yahoo.in",
        hospital_type: HospitalType::PHC,
        location: "Kauli",
    },
    Hospital {
        id: "phc-harpalpur",
        name: "PHC Harpalpur",
        phone: "01762-260280",
        email: "nrhmhrpl@gmail.com",
        hospital_type: HospitalType::PHC,
        location: "Harpalpur",
    },
    Hospital {
        id: "phc-bhadson",
        name: "PHC Bhadson",
        phone: "01765-260116",
        email: "smobhadson@gmail.com",
        hospital_type: HospitalType::PHC,
        location: "Bhadson",
    },
    Hospital {
        id: "phc-dudhan-sadhan",
        name: "PHC Dudhan Sadhan",
        phone: "0175-2631042",
        email: "nrhmds@hotmail.com",
        hospital_type: HospitalType::PHC,
        location: "Dudhan Sadhan",
    },
    Hospital {
        id: "phc-kalomajra",
        name: "PHC Kalomajra",
        phone: "01762-258726",
        email: "smokalomajra@yahoo.com",
        hospital_type: HospitalType::PHC,
        location: "Kalomajra",
    },
    Hospital {
        id: "phc-shutrana",
        name: "PHC Shutrana",
        phone: "01764-222534",
        email: "nrhmshut@gmail.com",
        hospital_type: HospitalType::PHC,
        location: "Shutrana",
    },
    Hospital {
        id: "chc-model-town",
        name: "CHC Model Town",
        phone: "0175-2223375",
        email: "smochcmtpatiala@ymail.com",
        hospital_type: HospitalType::CHC,
        location: "Model Town",
    },
    Hospital {
        id: "chc-ghanaur",
        name: "CHC Ghanaur",
        phone: "07162-267358",
        email: "chcghanaur@yahoo.com",
        hospital_type: HospitalType::CHC,
        location: "Ghanaur",
    },
    Hospital {
        id: "chc-badshapur",
        name: "CHC Badshapur",
        phone: "01764-250474",
        email: "nrhmshut@gmail.com",
        hospital_type: HospitalType::CHC,
        location: "Badshapur",
    },
    Hospital {
        id: "chc-patran",
        name: "CHC Patran",
        phone: "01764-242752",
        email: "chcpatran5@gmail.com",
        hospital_type: HospitalType::CHC,
        location: "Patran",
    },
];
